//! Pure domain services.

pub mod export;
pub mod submission;
