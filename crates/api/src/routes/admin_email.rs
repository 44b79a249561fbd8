//! Admin bulk email endpoint.

use std::collections::HashSet;

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::RegistrationStatus;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminAuth;
use crate::services::bulk_email::{send_bulk, BulkEmailReport};

/// Request to mail every registrant of a form.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct BulkEmailRequest {
    pub form_id: Uuid,

    #[validate(length(min = 1, max = 300, message = "Subject must be 1-300 characters"))]
    pub subject: String,

    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,

    /// Restrict recipients to one status (e.g. `confirmed`). Omitted
    /// means everyone except cancelled registrations.
    pub only_status: Option<String>,
}

/// POST /api/v1/admin/email/bulk
///
/// Sends the message to each registrant of the form with bounded
/// concurrency. Recipients that cannot be delivered after the retry
/// budget come back in the report's dead-letter list.
pub async fn send_bulk_email(
    State(state): State<AppState>,
    auth: AdminAuth,
    Json(request): Json<BulkEmailRequest>,
) -> Result<Json<BulkEmailReport>, ApiError> {
    request.validate()?;

    if !state.mail.is_enabled() {
        return Err(ApiError::ServiceUnavailable(
            "Mail sending is not enabled".to_string(),
        ));
    }

    let status_filter = match &request.only_status {
        Some(raw) => Some(RegistrationStatus::parse(raw).ok_or_else(|| {
            ApiError::Validation(format!("Unknown status '{}'", raw))
        })?),
        None => None,
    };

    let form = state
        .forms
        .find_by_id(request.form_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Form not found".to_string()))?;

    let registrations = state.registrations.list_for_form(form.id).await?;

    // Dedupe case-insensitively; the same address may appear with
    // different casing across registrations of one household
    let mut seen = HashSet::new();
    let recipients: Vec<String> = registrations
        .into_iter()
        .map(domain::models::Registration::from)
        .filter(|r| match status_filter {
            Some(status) => r.status == status,
            None => r.status != RegistrationStatus::Cancelled,
        })
        .filter(|r| seen.insert(r.participant_email.to_lowercase()))
        .map(|r| r.participant_email)
        .collect();

    info!(
        form_id = %form.id,
        admin = %auth.username,
        recipients = recipients.len(),
        "Bulk email dispatch started"
    );

    let report = send_bulk(
        state.mail.clone(),
        &state.config.bulk_email,
        recipients,
        request.subject,
        request.message,
    )
    .await;

    Ok(Json(report))
}
