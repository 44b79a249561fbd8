//! HTTP route handlers.

pub mod admin_email;
pub mod admin_forms;
pub mod admin_registrations;
pub mod auth;
pub mod forms;
pub mod health;
pub mod registrations;
