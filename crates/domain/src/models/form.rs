//! Registration form domain models.
//!
//! A `RegistrationForm` is the admin-authored schema for one event's
//! public signup form; its `FormField` list drives which controls the
//! renderer presents and what the submission validator enforces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use shared::validation::validate_field_name;

/// Maximum accepted photo size in bytes (5 MB).
///
/// The original form enforced this client-side before holding the file in
/// memory; the server re-checks it after decoding.
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Admin-authored schema describing what a public event-signup form collects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RegistrationForm {
    pub id: Uuid,
    pub event_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub max_registrations: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub allowed_email_domains: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One entry in a registration form's schema.
///
/// Fields have no stable identity across edits: saving a form replaces its
/// whole field list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FormField {
    pub id: Uuid,
    pub form_id: Uuid,
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub options: Vec<String>,
    pub required: bool,
    pub display_order: i32,
}

/// The field types an admin can choose when authoring a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Phone,
    Textarea,
    Select,
    Checkbox,
    Photo,
}

impl FieldType {
    /// Parses a stored type string. Unrecognized values fall back to `Text`
    /// so the type-to-control mapping stays total.
    pub fn parse_or_text(raw: &str) -> Self {
        match raw {
            "text" => FieldType::Text,
            "email" => FieldType::Email,
            "phone" => FieldType::Phone,
            "textarea" => FieldType::Textarea,
            "select" => FieldType::Select,
            "checkbox" => FieldType::Checkbox,
            "photo" => FieldType::Photo,
            _ => FieldType::Text,
        }
    }

    /// The stored string form of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Checkbox => "checkbox",
            FieldType::Photo => "photo",
        }
    }

    /// Whether this type requires an `options` list.
    pub fn needs_options(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Checkbox)
    }

    /// Resolves the input control the renderer presents for this type.
    pub fn control(&self) -> ControlKind {
        match self {
            FieldType::Text => ControlKind::TextInput,
            FieldType::Email => ControlKind::EmailInput,
            FieldType::Phone => ControlKind::PhoneInput,
            FieldType::Textarea => ControlKind::TextArea,
            FieldType::Select => ControlKind::SelectDropdown,
            FieldType::Checkbox => ControlKind::CheckboxGroup,
            FieldType::Photo => ControlKind::PhotoUpload,
        }
    }
}

/// The input control a field resolves to at render time.
///
/// `CheckboxGroup` accumulates a set of selected option strings;
/// `PhotoUpload` is a file picker capped at [`MAX_PHOTO_BYTES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    TextInput,
    EmailInput,
    PhoneInput,
    TextArea,
    SelectDropdown,
    CheckboxGroup,
    PhotoUpload,
}

/// A field as presented to the public renderer: the descriptor plus its
/// resolved control.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RenderedField {
    pub name: String,
    pub label: String,
    pub control: ControlKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_upload_bytes: Option<usize>,
}

impl From<&FormField> for RenderedField {
    fn from(field: &FormField) -> Self {
        let control = field.field_type.control();
        Self {
            name: field.name.clone(),
            label: field.label.clone(),
            control,
            options: field.options.clone(),
            required: field.required,
            max_upload_bytes: (control == ControlKind::PhotoUpload).then_some(MAX_PHOTO_BYTES),
        }
    }
}

/// One field definition in a create/update form request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct FieldDefinition {
    #[validate(custom(function = "validate_field_name"))]
    pub name: String,

    #[validate(length(min = 1, max = 200, message = "Label must be 1-200 characters"))]
    pub label: String,

    pub field_type: FieldType,

    /// Options for select/checkbox fields.
    #[serde(default)]
    pub options: Vec<String>,

    #[serde(default)]
    pub required: bool,
}

/// Request to create a registration form with its fields.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
#[validate(schema(function = "validate_form_fields"))]
pub struct CreateFormRequest {
    pub event_id: Uuid,

    #[validate(length(min = 1, max = 300, message = "Title must be 1-300 characters"))]
    pub title: String,

    pub description: Option<String>,

    #[serde(default = "default_is_active")]
    pub is_active: bool,

    #[validate(range(min = 1, message = "max_registrations must be at least 1"))]
    pub max_registrations: Option<i32>,

    pub registration_deadline: Option<DateTime<Utc>>,

    #[serde(default)]
    pub allowed_email_domains: Vec<String>,

    #[validate(nested)]
    pub fields: Vec<FieldDefinition>,
}

/// Request to update a registration form. The field list replaces the
/// stored one wholesale.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
#[validate(schema(function = "validate_update_fields"))]
pub struct UpdateFormRequest {
    #[validate(length(min = 1, max = 300, message = "Title must be 1-300 characters"))]
    pub title: String,

    pub description: Option<String>,

    pub is_active: bool,

    #[validate(range(min = 1, message = "max_registrations must be at least 1"))]
    pub max_registrations: Option<i32>,

    pub registration_deadline: Option<DateTime<Utc>>,

    #[serde(default)]
    pub allowed_email_domains: Vec<String>,

    #[validate(nested)]
    pub fields: Vec<FieldDefinition>,
}

fn default_is_active() -> bool {
    true
}

fn validate_form_fields(request: &CreateFormRequest) -> Result<(), ValidationError> {
    check_field_list(&request.fields)
}

fn validate_update_fields(request: &UpdateFormRequest) -> Result<(), ValidationError> {
    check_field_list(&request.fields)
}

/// Cross-field rules the derive cannot express: option lists where the type
/// needs them, and field names unique within the form.
fn check_field_list(fields: &[FieldDefinition]) -> Result<(), ValidationError> {
    let mut seen = std::collections::HashSet::new();
    for field in fields {
        if field.field_type.needs_options() && field.options.is_empty() {
            let mut err = ValidationError::new("options_required");
            err.message = Some(
                format!(
                    "Field '{}' is a {} field and must supply options",
                    field.name,
                    field.field_type.as_str()
                )
                .into(),
            );
            return Err(err);
        }
        if !seen.insert(field.name.as_str()) {
            let mut err = ValidationError::new("duplicate_field_name");
            err.message = Some(format!("Duplicate field name '{}'", field.name).into());
            return Err(err);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, field_type: FieldType, options: Vec<&str>) -> FieldDefinition {
        FieldDefinition {
            name: name.to_string(),
            label: name.to_string(),
            field_type,
            options: options.into_iter().map(String::from).collect(),
            required: false,
        }
    }

    #[test]
    fn test_control_mapping_is_total() {
        assert_eq!(FieldType::parse_or_text("select").control(), ControlKind::SelectDropdown);
        assert_eq!(FieldType::parse_or_text("photo").control(), ControlKind::PhotoUpload);
        // Unrecognized types fall back to a plain text input
        assert_eq!(FieldType::parse_or_text("signature").control(), ControlKind::TextInput);
        assert_eq!(FieldType::parse_or_text("").control(), ControlKind::TextInput);
    }

    #[test]
    fn test_rendered_photo_field_carries_size_cap() {
        let form_field = FormField {
            id: Uuid::new_v4(),
            form_id: Uuid::new_v4(),
            name: "photo_id".to_string(),
            label: "ID Photo".to_string(),
            field_type: FieldType::Photo,
            options: vec![],
            required: true,
            display_order: 0,
        };
        let rendered = RenderedField::from(&form_field);
        assert_eq!(rendered.control, ControlKind::PhotoUpload);
        assert_eq!(rendered.max_upload_bytes, Some(MAX_PHOTO_BYTES));
    }

    #[test]
    fn test_select_without_options_rejected() {
        let request = CreateFormRequest {
            event_id: Uuid::new_v4(),
            title: "Hackathon 2025".to_string(),
            description: None,
            is_active: true,
            max_registrations: None,
            registration_deadline: None,
            allowed_email_domains: vec![],
            fields: vec![field("year", FieldType::Select, vec![])],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_duplicate_field_names_rejected() {
        let request = CreateFormRequest {
            event_id: Uuid::new_v4(),
            title: "Hackathon 2025".to_string(),
            description: None,
            is_active: true,
            max_registrations: None,
            registration_deadline: None,
            allowed_email_domains: vec![],
            fields: vec![
                field("college", FieldType::Text, vec![]),
                field("college", FieldType::Textarea, vec![]),
            ],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_valid_form_request() {
        let request = CreateFormRequest {
            event_id: Uuid::new_v4(),
            title: "Hackathon 2025".to_string(),
            description: Some("Annual 24h hackathon".to_string()),
            is_active: true,
            max_registrations: Some(150),
            registration_deadline: None,
            allowed_email_domains: vec!["@college.edu".to_string()],
            fields: vec![
                field("college", FieldType::Text, vec![]),
                field("year", FieldType::Select, vec!["FE", "SE", "TE", "BE"]),
            ],
        };
        assert!(request.validate().is_ok());
    }
}
