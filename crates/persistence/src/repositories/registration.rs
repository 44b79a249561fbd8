//! Repository for registration database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::RegistrationEntity;

/// Column list shared by the registration queries.
const REGISTRATION_COLUMNS: &str = "id, form_id, event_id, participant_name, participant_email, \
     participant_phone, form_data, status, confirmation_sent, registration_date";

/// Data for a new registration row.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub form_id: Uuid,
    pub event_id: Uuid,
    pub participant_name: String,
    pub participant_email: String,
    pub participant_phone: Option<String>,
    pub form_data: serde_json::Value,
}

/// Repository for registration operations.
#[derive(Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    /// Creates a new registration repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Counts registrations for a form.
    pub async fn count_for_form(&self, form_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM registrations WHERE form_id = $1")
            .bind(form_id)
            .fetch_one(&self.pool)
            .await
    }

    /// Checks whether a registration with the given email, or (when
    /// supplied) the given phone, already exists for the form.
    ///
    /// This is the user-facing pre-check; the unique indexes on
    /// `(form_id, lower(participant_email))` and `(form_id,
    /// participant_phone)` are what actually close the race.
    pub async fn duplicate_exists(
        &self,
        form_id: Uuid,
        email: &str,
        phone: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM registrations
            WHERE form_id = $1
              AND (lower(participant_email) = lower($2)
                   OR ($3::text IS NOT NULL AND participant_phone = $3))
            "#,
        )
        .bind(form_id)
        .bind(email)
        .bind(phone)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    /// Inserts a registration row.
    ///
    /// A unique-index violation from a lost duplicate race surfaces as a
    /// database error with code 23505.
    pub async fn insert(
        &self,
        registration: NewRegistration,
    ) -> Result<RegistrationEntity, sqlx::Error> {
        sqlx::query_as::<_, RegistrationEntity>(&format!(
            r#"
            INSERT INTO registrations
                (form_id, event_id, participant_name, participant_email,
                 participant_phone, form_data)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(registration.form_id)
        .bind(registration.event_id)
        .bind(&registration.participant_name)
        .bind(&registration.participant_email)
        .bind(&registration.participant_phone)
        .bind(&registration.form_data)
        .fetch_one(&self.pool)
        .await
    }

    /// Lists all registrations for a form, oldest first.
    pub async fn list_for_form(
        &self,
        form_id: Uuid,
    ) -> Result<Vec<RegistrationEntity>, sqlx::Error> {
        sqlx::query_as::<_, RegistrationEntity>(&format!(
            r#"
            SELECT {REGISTRATION_COLUMNS}
            FROM registrations
            WHERE form_id = $1
            ORDER BY registration_date ASC
            "#
        ))
        .bind(form_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Updates a registration's status.
    ///
    /// Returns true if a row was updated.
    pub async fn update_status(
        &self,
        registration_id: Uuid,
        status: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE registrations SET status = $2 WHERE id = $1")
            .bind(registration_id)
            .bind(status)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Records whether the confirmation email went out.
    pub async fn set_confirmation_sent(
        &self,
        registration_id: Uuid,
        sent: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE registrations SET confirmation_sent = $2 WHERE id = $1")
            .bind(registration_id)
            .bind(sent)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Deletes a registration (admin-initiated).
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(&self, registration_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM registrations WHERE id = $1")
            .bind(registration_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
