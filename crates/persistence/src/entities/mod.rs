//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod admin_user;
pub mod form;
pub mod form_field;
pub mod registration;

pub use admin_user::AdminUserEntity;
pub use form::{FormEntity, FormWithCountEntity};
pub use form_field::FormFieldEntity;
pub use registration::RegistrationEntity;
