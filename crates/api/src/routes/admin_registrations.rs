//! Admin registration analytics, export and management endpoints.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use domain::models::{FormField, Registration, RegistrationStatus};
use domain::services::export::{build_export_table, export_filename, to_csv, ExportTable};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminAuth;

/// Flattened analytics view of a form's registrations.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AnalyticsResponse {
    pub form_id: Uuid,
    pub title: String,
    pub total: usize,
    pub confirmation_sent: usize,
    pub table: ExportTable,
}

/// Request to change a registration's status.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// GET /api/v1/admin/forms/:form_id/registrations
///
/// Returns the same flat table the CSV export uses, plus summary counts,
/// so the dashboard and the download always agree.
pub async fn list_registrations(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(form_id): Path<Uuid>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let (form, fields, registrations) = load_form_data(&state, form_id).await?;

    let confirmation_sent = registrations.iter().filter(|r| r.confirmation_sent).count();
    let table = build_export_table(&fields, &registrations);

    Ok(Json(AnalyticsResponse {
        form_id,
        title: form.title,
        total: registrations.len(),
        confirmation_sent,
        table,
    }))
}

/// GET /api/v1/admin/forms/:form_id/registrations.csv
///
/// Streams the flattened table as a CSV attachment named
/// `registrations_<title>_<date>.csv`.
pub async fn export_registrations_csv(
    State(state): State<AppState>,
    auth: AdminAuth,
    Path(form_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let (form, fields, registrations) = load_form_data(&state, form_id).await?;

    let table = build_export_table(&fields, &registrations);
    let csv = to_csv(&table);
    let filename = export_filename(&form.title, Utc::now().date_naive());

    info!(
        form_id = %form_id,
        admin = %auth.username,
        rows = table.rows.len(),
        "Registrations exported"
    );

    let response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    )
        .into_response();

    Ok(response)
}

/// PATCH /api/v1/admin/registrations/:registration_id/status
pub async fn update_registration_status(
    State(state): State<AppState>,
    auth: AdminAuth,
    Path(registration_id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<StatusCode, ApiError> {
    let status = RegistrationStatus::parse(&request.status).ok_or_else(|| {
        ApiError::Validation(format!(
            "Unknown status '{}'; expected confirmed, waitlisted or cancelled",
            request.status
        ))
    })?;

    let updated = state
        .registrations
        .update_status(registration_id, status.as_str())
        .await?;
    if !updated {
        return Err(ApiError::NotFound("Registration not found".to_string()));
    }

    info!(
        registration_id = %registration_id,
        admin = %auth.username,
        status = status.as_str(),
        "Registration status updated"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/admin/registrations/:registration_id
pub async fn delete_registration(
    State(state): State<AppState>,
    auth: AdminAuth,
    Path(registration_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = state.registrations.delete(registration_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Registration not found".to_string()));
    }

    info!(
        registration_id = %registration_id,
        admin = %auth.username,
        "Registration deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

async fn load_form_data(
    state: &AppState,
    form_id: Uuid,
) -> Result<
    (
        domain::models::RegistrationForm,
        Vec<FormField>,
        Vec<Registration>,
    ),
    ApiError,
> {
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

    let registrations: Vec<Registration> = state
        .registrations
        .list_for_form(form_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok((form.into(), fields, registrations))
}
