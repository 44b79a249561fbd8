//! Admin JWT authentication extractor.
//!
//! Validates the Bearer token on admin routes and exposes the
//! authenticated admin's identity to handlers.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated admin information from a session token.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    /// Admin user ID from the JWT subject claim.
    pub admin_id: Uuid,
    /// Username carried in the token.
    pub username: String,
    /// JWT ID (jti) for session tracking.
    pub jti: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        if !auth_header.starts_with("Bearer ") {
            return Err(ApiError::Unauthorized(
                "Invalid Authorization header format".to_string(),
            ));
        }

        let token = &auth_header[7..];

        let claims = state
            .jwt
            .validate_token(token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        let admin_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Unauthorized("Invalid token subject".to_string()))?;

        Ok(AdminAuth {
            admin_id,
            username: claims.username,
            jti: claims.jti,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_auth_clone() {
        let auth = AdminAuth {
            admin_id: Uuid::new_v4(),
            username: "admin".to_string(),
            jti: "test_jti".to_string(),
        };
        let cloned = auth.clone();
        assert_eq!(auth.admin_id, cloned.admin_id);
        assert_eq!(auth.username, cloned.username);
    }

    #[test]
    fn test_admin_auth_debug() {
        let auth = AdminAuth {
            admin_id: Uuid::new_v4(),
            username: "admin".to_string(),
            jti: "test_jti".to_string(),
        };
        let debug_str = format!("{:?}", auth);
        assert!(debug_str.contains("AdminAuth"));
        assert!(debug_str.contains("admin_id"));
    }
}
