//! Admin form management endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    CreateFormRequest, FieldDefinition, FormField, RegistrationForm, UpdateFormRequest,
};
use persistence::entities::FormWithCountEntity;
use persistence::repositories::{NewForm, NewFormField, UpdatedForm};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminAuth;

/// A form with its fields, as returned from create/update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FormResponse {
    #[serde(flatten)]
    pub form: RegistrationForm,
    pub fields: Vec<FormField>,
}

/// One row in the admin form list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FormSummary {
    pub id: Uuid,
    pub event_id: Uuid,
    pub title: String,
    pub is_active: bool,
    pub max_registrations: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub registration_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<FormWithCountEntity> for FormSummary {
    fn from(entity: FormWithCountEntity) -> Self {
        Self {
            id: entity.id,
            event_id: entity.event_id,
            title: entity.title,
            is_active: entity.is_active,
            max_registrations: entity.max_registrations,
            registration_deadline: entity.registration_deadline,
            registration_count: entity.registration_count,
            created_at: entity.created_at,
        }
    }
}

/// POST /api/v1/admin/forms
pub async fn create_form(
    State(state): State<AppState>,
    auth: AdminAuth,
    Json(request): Json<CreateFormRequest>,
) -> Result<(StatusCode, Json<FormResponse>), ApiError> {
    request.validate()?;

    let new_form = NewForm {
        event_id: request.event_id,
        title: request.title.clone(),
        description: request.description.clone(),
        is_active: request.is_active,
        max_registrations: request.max_registrations,
        registration_deadline: request.registration_deadline,
        allowed_email_domains: request.allowed_email_domains.clone(),
    };
    let fields = to_new_fields(&request.fields);

    let entity = state.forms.create_with_fields(new_form, &fields).await?;
    let form_id = entity.id;

    info!(
        form_id = %form_id,
        admin = %auth.username,
        field_count = fields.len(),
        "Form created"
    );

    Ok((
        StatusCode::CREATED,
        Json(form_with_fields(&state, entity.into()).await?),
    ))
}

/// PUT /api/v1/admin/forms/:form_id
///
/// Replaces the form's metadata and its whole field list.
pub async fn update_form(
    State(state): State<AppState>,
    auth: AdminAuth,
    Path(form_id): Path<Uuid>,
    Json(request): Json<UpdateFormRequest>,
) -> Result<Json<FormResponse>, ApiError> {
    request.validate()?;

    let updated = UpdatedForm {
        title: request.title.clone(),
        description: request.description.clone(),
        is_active: request.is_active,
        max_registrations: request.max_registrations,
        registration_deadline: request.registration_deadline,
        allowed_email_domains: request.allowed_email_domains.clone(),
    };
    let fields = to_new_fields(&request.fields);

    let entity = state
        .forms
        .update_with_fields(form_id, updated, &fields)
        .await?
        .ok_or_else(|| ApiError::NotFound("Form not found".to_string()))?;

    info!(form_id = %form_id, admin = %auth.username, "Form updated");

    Ok(Json(form_with_fields(&state, entity.into()).await?))
}

/// GET /api/v1/admin/forms
pub async fn list_forms(
    State(state): State<AppState>,
    _auth: AdminAuth,
) -> Result<Json<Vec<FormSummary>>, ApiError> {
    let forms = state.forms.list_with_counts().await?;
    Ok(Json(forms.into_iter().map(Into::into).collect()))
}

/// DELETE /api/v1/admin/forms/:form_id
///
/// Deletes the form; its fields and registrations cascade.
pub async fn delete_form(
    State(state): State<AppState>,
    auth: AdminAuth,
    Path(form_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = state.forms.delete(form_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Form not found".to_string()));
    }

    info!(form_id = %form_id, admin = %auth.username, "Form deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn to_new_fields(definitions: &[FieldDefinition]) -> Vec<NewFormField> {
    definitions
        .iter()
        .enumerate()
        .map(|(index, def)| NewFormField {
            name: def.name.clone(),
            label: def.label.clone(),
            field_type: def.field_type.as_str().to_string(),
            options: def.options.clone(),
            required: def.required,
            display_order: index as i32,
        })
        .collect()
}

async fn form_with_fields(
    state: &AppState,
    form: RegistrationForm,
) -> Result<FormResponse, ApiError> {
    let fields: Vec<FormField> = state
        .fields
        .list_for_form(form.id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(FormResponse { form, fields })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::FieldType;

    #[test]
    fn test_field_definitions_keep_request_order() {
        let defs = vec![
            FieldDefinition {
                name: "college".to_string(),
                label: "College".to_string(),
                field_type: FieldType::Text,
                options: vec![],
                required: true,
            },
            FieldDefinition {
                name: "year".to_string(),
                label: "Year".to_string(),
                field_type: FieldType::Select,
                options: vec!["FE".to_string(), "SE".to_string()],
                required: false,
            },
        ];

        let fields = to_new_fields(&defs);
        assert_eq!(fields[0].display_order, 0);
        assert_eq!(fields[1].display_order, 1);
        assert_eq!(fields[1].field_type, "select");
        assert_eq!(fields[1].options, vec!["FE", "SE"]);
    }
}
