//! Public form rendering endpoint.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use domain::models::{FormField, RegistrationForm, RenderedField};

use crate::app::AppState;
use crate::error::ApiError;

/// A form as presented to the public renderer: schema metadata plus each
/// field resolved to its input control.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FormView {
    pub id: Uuid,
    pub event_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub max_registrations: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
    /// Shown so the form can hint at the email restriction up front.
    pub allowed_email_domains: Vec<String>,
    pub fields: Vec<RenderedField>,
}

impl FormView {
    fn new(form: RegistrationForm, fields: &[FormField]) -> Self {
        Self {
            id: form.id,
            event_id: form.event_id,
            title: form.title,
            description: form.description,
            is_active: form.is_active,
            max_registrations: form.max_registrations,
            registration_deadline: form.registration_deadline,
            allowed_email_domains: form.allowed_email_domains,
            fields: fields.iter().map(RenderedField::from).collect(),
        }
    }
}

/// GET /api/v1/forms/:form_id
///
/// Returns the form with its fields resolved to input controls, in
/// display order. Inactive forms are still returned so the page can show
/// a closed state instead of a blank 404.
pub async fn get_form(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> Result<Json<FormView>, ApiError> {
    let form = state
        .forms
        .find_by_id(form_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Form not found".to_string()))?;

    let fields: Vec<FormField> = state
        .fields
        .list_for_form(form_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(FormView::new(form.into(), &fields)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::{ControlKind, FieldType};

    #[test]
    fn test_form_view_resolves_controls_in_order() {
        let form = RegistrationForm {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            title: "Hackathon 2025".to_string(),
            description: None,
            is_active: true,
            max_registrations: Some(100),
            registration_deadline: None,
            allowed_email_domains: vec!["@college.edu".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let fields = vec![
            FormField {
                id: Uuid::new_v4(),
                form_id: form.id,
                name: "college".to_string(),
                label: "College".to_string(),
                field_type: FieldType::Text,
                options: vec![],
                required: true,
                display_order: 0,
            },
            FormField {
                id: Uuid::new_v4(),
                form_id: form.id,
                name: "photo_id".to_string(),
                label: "ID Photo".to_string(),
                field_type: FieldType::Photo,
                options: vec![],
                required: true,
                display_order: 1,
            },
        ];

        let view = FormView::new(form, &fields);
        assert_eq!(view.fields.len(), 2);
        assert_eq!(view.fields[0].control, ControlKind::TextInput);
        assert_eq!(view.fields[1].control, ControlKind::PhotoUpload);
        assert!(view.fields[1].max_upload_bytes.is_some());
    }
}
