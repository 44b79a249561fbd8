//! Public registration submission endpoint.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use domain::models::SubmitRegistrationRequest;

use crate::app::AppState;
use crate::error::ApiError;

/// Response to an accepted submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SubmitResponse {
    pub id: Uuid,
    pub status: String,
    pub confirmation_sent: bool,
    pub message: String,
}

/// POST /api/v1/forms/:form_id/registrations
///
/// Validates and persists one submission. Rejections carry the
/// user-facing message for the failing check.
pub async fn submit_registration(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
    Json(request): Json<SubmitRegistrationRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let outcome = state.submissions.submit(form_id, request).await?;

    let response = SubmitResponse {
        id: outcome.registration.id,
        status: outcome.registration.status.as_str().to_string(),
        confirmation_sent: outcome.confirmation_sent,
        message: "Registration received".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}
