//! Repository implementations for database operations.

pub mod admin_user;
pub mod form;
pub mod form_field;
pub mod registration;

pub use admin_user::AdminUserRepository;
pub use form::{FormRepository, NewForm, UpdatedForm};
pub use form_field::{FormFieldRepository, NewFormField};
pub use registration::{NewRegistration, RegistrationRepository};
