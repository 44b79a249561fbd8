//! Registration form entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::RegistrationForm;

/// Database row mapping for the registration_forms table.
#[derive(Debug, Clone, FromRow)]
pub struct FormEntity {
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

impl From<FormEntity> for RegistrationForm {
    fn from(entity: FormEntity) -> Self {
        Self {
            id: entity.id,
            event_id: entity.event_id,
            title: entity.title,
            description: entity.description,
            is_active: entity.is_active,
            max_registrations: entity.max_registrations,
            registration_deadline: entity.registration_deadline,
            allowed_email_domains: entity.allowed_email_domains,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Form row joined with its registration count, for the admin list view.
#[derive(Debug, Clone, FromRow)]
pub struct FormWithCountEntity {
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
    pub registration_count: i64,
}
