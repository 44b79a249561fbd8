//! Shared utilities and common types for the event registration backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Password hashing with Argon2id
//! - JWT session tokens for admin authentication
//! - Common validation logic

pub mod jwt;
pub mod password;
pub mod validation;
