//! Application services.

pub mod admin_bootstrap;
pub mod bulk_email;
pub mod mail;
pub mod storage;
pub mod submission;
