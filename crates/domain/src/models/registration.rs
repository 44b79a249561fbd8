//! Registration (submission) domain models.

use std::collections::HashMap;

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::validate_phone;

/// A value submitted for one form field.
///
/// Typed union instead of a free-form JSON bag: strings for single-value
/// controls, string arrays for checkbox groups, booleans for flags. The
/// schema is still only enforced at the submission boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Text(String),
    Multi(Vec<String>),
    Flag(bool),
}

impl FormValue {
    /// Whether this value counts as "not answered" for required-field
    /// checks: empty string or empty selection. A boolean is always a
    /// deliberate answer.
    pub fn is_empty(&self) -> bool {
        match self {
            FormValue::Text(s) => s.trim().is_empty(),
            FormValue::Multi(items) => items.is_empty(),
            FormValue::Flag(_) => false,
        }
    }
}

/// Lifecycle status of a registration row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Confirmed,
    Waitlisted,
    Cancelled,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Confirmed => "confirmed",
            RegistrationStatus::Waitlisted => "waitlisted",
            RegistrationStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "confirmed" => Some(RegistrationStatus::Confirmed),
            "waitlisted" => Some(RegistrationStatus::Waitlisted),
            "cancelled" => Some(RegistrationStatus::Cancelled),
            _ => None,
        }
    }
}

/// A visitor's completed registration, persisted once and never mutated
/// except for status, the confirmation flag, and admin-initiated delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Registration {
    pub id: Uuid,
    pub form_id: Uuid,
    pub event_id: Uuid,
    pub participant_name: String,
    pub participant_email: String,
    pub participant_phone: Option<String>,
    pub form_data: HashMap<String, FormValue>,
    pub status: RegistrationStatus,
    pub confirmation_sent: bool,
    pub registration_date: DateTime<Utc>,
}

/// A photo attached to a submission, transported as base64.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PhotoUpload {
    pub file_name: String,
    #[serde(default)]
    pub content_type: Option<String>,
    pub data_base64: String,
}

impl PhotoUpload {
    /// Decodes the photo payload into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(self.data_base64.as_bytes())
    }
}

/// A visitor's submission for a form.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SubmitRegistrationRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub participant_name: String,

    #[validate(email(message = "A valid email address is required"))]
    pub participant_email: String,

    #[validate(custom(function = "validate_phone"))]
    pub participant_phone: Option<String>,

    /// Values keyed by field name.
    #[serde(default)]
    pub form_data: HashMap<String, FormValue>,

    /// Photo payloads keyed by field name, for `photo`-type fields.
    #[serde(default)]
    pub photos: HashMap<String, PhotoUpload>,
}
