//! Registration entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{FormValue, Registration, RegistrationStatus};

/// Database row mapping for the registrations table.
///
/// `form_data` is stored as JSONB; values deserialize into the typed
/// [`FormValue`] union.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationEntity {
    pub id: Uuid,
    pub form_id: Uuid,
    pub event_id: Uuid,
    pub participant_name: String,
    pub participant_email: String,
    pub participant_phone: Option<String>,
    pub form_data: serde_json::Value,
    pub status: String,
    pub confirmation_sent: bool,
    pub registration_date: DateTime<Utc>,
}

impl From<RegistrationEntity> for Registration {
    fn from(entity: RegistrationEntity) -> Self {
        // Values that do not fit the typed union are dropped rather than
        // failing the whole read; the store does not enforce the schema.
        let form_data = match entity.form_data {
            serde_json::Value::Object(map) => map
                .into_iter()
                .filter_map(|(key, value)| {
                    serde_json::from_value::<FormValue>(value)
                        .ok()
                        .map(|v| (key, v))
                })
                .collect(),
            _ => Default::default(),
        };

        Self {
            id: entity.id,
            form_id: entity.form_id,
            event_id: entity.event_id,
            participant_name: entity.participant_name,
            participant_email: entity.participant_email,
            participant_phone: entity.participant_phone,
            form_data,
            status: RegistrationStatus::parse(&entity.status)
                .unwrap_or(RegistrationStatus::Confirmed),
            confirmation_sent: entity.confirmation_sent,
            registration_date: entity.registration_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_data_json_conversion() {
        let entity = RegistrationEntity {
            id: Uuid::new_v4(),
            form_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            participant_name: "Asha".to_string(),
            participant_email: "asha@college.edu".to_string(),
            participant_phone: None,
            form_data: serde_json::json!({
                "college": "City College",
                "languages": ["C", "Rust"],
                "first_time": true,
                "weird": {"nested": "object"}
            }),
            status: "confirmed".to_string(),
            confirmation_sent: false,
            registration_date: Utc::now(),
        };

        let registration: Registration = entity.into();
        assert_eq!(
            registration.form_data.get("college"),
            Some(&FormValue::Text("City College".to_string()))
        );
        assert_eq!(
            registration.form_data.get("languages"),
            Some(&FormValue::Multi(vec!["C".to_string(), "Rust".to_string()]))
        );
        assert_eq!(
            registration.form_data.get("first_time"),
            Some(&FormValue::Flag(true))
        );
        // Nested objects do not fit the typed union and are dropped
        assert!(registration.form_data.get("weird").is_none());
    }

    #[test]
    fn test_unknown_status_defaults_to_confirmed() {
        let entity = RegistrationEntity {
            id: Uuid::new_v4(),
            form_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            participant_name: "Asha".to_string(),
            participant_email: "asha@college.edu".to_string(),
            participant_phone: None,
            form_data: serde_json::json!({}),
            status: "mystery".to_string(),
            confirmation_sent: false,
            registration_date: Utc::now(),
        };
        let registration: Registration = entity.into();
        assert_eq!(registration.status, RegistrationStatus::Confirmed);
    }
}
