//! Domain models and services for the event registration backend.
//!
//! This crate contains the registration-form schema types, submission
//! types, and the pure domain logic (submission validation, CSV export
//! flattening) that the API layer orchestrates.

pub mod models;
pub mod services;
