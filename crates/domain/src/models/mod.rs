//! Domain model types.

pub mod admin;
pub mod form;
pub mod registration;

pub use admin::{AdminUser, LoginRequest, LoginResponse};
pub use form::{
    ControlKind, CreateFormRequest, FieldDefinition, FieldType, FormField, RegistrationForm,
    RenderedField, UpdateFormRequest, MAX_PHOTO_BYTES,
};
pub use registration::{
    FormValue, PhotoUpload, Registration, RegistrationStatus, SubmitRegistrationRequest,
};
