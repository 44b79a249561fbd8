//! Admin authentication endpoint.

use axum::{extract::State, Json};
use tracing::{info, warn};
use validator::Validate;

use domain::models::{LoginRequest, LoginResponse};
use shared::password::verify_password;

use crate::app::AppState;
use crate::error::ApiError;

/// POST /api/v1/auth/login
///
/// Verifies the credentials against the stored Argon2id hash and issues
/// an expiring session token. The failure message is the same for an
/// unknown username and a wrong password.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    let admin = state
        .admins
        .find_by_username(&request.username)
        .await?
        .ok_or_else(|| {
            warn!(username = %request.username, "Login attempt for unknown admin");
            invalid_credentials()
        })?;

    let verified = verify_password(&request.password, &admin.password_hash)
        .map_err(|e| ApiError::Internal(format!("Password verification failed: {}", e)))?;

    if !verified {
        warn!(username = %request.username, "Login attempt with wrong password");
        return Err(invalid_credentials());
    }

    let token = state
        .jwt
        .generate_token(admin.id, &admin.username)
        .map_err(|e| ApiError::Internal(format!("Token generation failed: {}", e)))?;

    info!(username = %admin.username, admin_id = %admin.id, "Admin logged in");

    Ok(Json(LoginResponse {
        token,
        expires_in_secs: state.jwt.token_expiry_secs,
    }))
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid username or password".to_string())
}
