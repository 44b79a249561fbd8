//! Admin user domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// An administrator of the back office.
///
/// The password is stored as an Argon2id PHC hash; the hash never leaves
/// the persistence boundary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminUser {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Login request for the admin dashboard.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 100, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, max = 200, message = "Password is required"))]
    pub password: String,
}

/// Response carrying a server-issued, expiring session token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LoginResponse {
    pub token: String,
    pub expires_in_secs: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_requires_both_fields() {
        let empty = LoginRequest {
            username: String::new(),
            password: "pw".to_string(),
        };
        assert!(empty.validate().is_err());

        let ok = LoginRequest {
            username: "admin".to_string(),
            password: "pw".to_string(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_admin_user_serialization_omits_hash() {
        let admin = AdminUser {
            id: Uuid::new_v4(),
            username: "admin".to_string(),
            password_hash: "$argon2id$...".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&admin).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("admin"));
    }
}
