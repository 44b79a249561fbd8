//! Repository for registration form database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{FormEntity, FormWithCountEntity};
use crate::repositories::form_field::{replace_fields_tx, NewFormField};

/// Column list shared by the form queries.
const FORM_COLUMNS: &str = "id, event_id, title, description, is_active, max_registrations, \
     registration_deadline, allowed_email_domains, created_at, updated_at";

/// Data for a new registration form.
#[derive(Debug, Clone)]
pub struct NewForm {
    pub event_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub max_registrations: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub allowed_email_domains: Vec<String>,
}

/// Data for updating an existing form.
#[derive(Debug, Clone)]
pub struct UpdatedForm {
    pub title: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub max_registrations: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub allowed_email_domains: Vec<String>,
}

/// Repository for registration form operations.
#[derive(Clone)]
pub struct FormRepository {
    pool: PgPool,
}

impl FormRepository {
    /// Creates a new form repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds a form by ID.
    pub async fn find_by_id(&self, form_id: Uuid) -> Result<Option<FormEntity>, sqlx::Error> {
        sqlx::query_as::<_, FormEntity>(&format!(
            "SELECT {FORM_COLUMNS} FROM registration_forms WHERE id = $1"
        ))
        .bind(form_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Creates a form together with its fields in one transaction.
    pub async fn create_with_fields(
        &self,
        form: NewForm,
        fields: &[NewFormField],
    ) -> Result<FormEntity, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let entity = sqlx::query_as::<_, FormEntity>(&format!(
            r#"
            INSERT INTO registration_forms
                (event_id, title, description, is_active, max_registrations,
                 registration_deadline, allowed_email_domains)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {FORM_COLUMNS}
            "#
        ))
        .bind(form.event_id)
        .bind(&form.title)
        .bind(&form.description)
        .bind(form.is_active)
        .bind(form.max_registrations)
        .bind(form.registration_deadline)
        .bind(&form.allowed_email_domains)
        .fetch_one(&mut *tx)
        .await?;

        replace_fields_tx(&mut tx, entity.id, fields).await?;

        tx.commit().await?;
        Ok(entity)
    }

    /// Updates a form and replaces its whole field list in one transaction.
    ///
    /// Fields have no stable identity across edits: the stored list is
    /// deleted and reinserted.
    ///
    /// Returns `None` if the form does not exist.
    pub async fn update_with_fields(
        &self,
        form_id: Uuid,
        form: UpdatedForm,
        fields: &[NewFormField],
    ) -> Result<Option<FormEntity>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let entity = sqlx::query_as::<_, FormEntity>(&format!(
            r#"
            UPDATE registration_forms
            SET title = $2, description = $3, is_active = $4, max_registrations = $5,
                registration_deadline = $6, allowed_email_domains = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {FORM_COLUMNS}
            "#
        ))
        .bind(form_id)
        .bind(&form.title)
        .bind(&form.description)
        .bind(form.is_active)
        .bind(form.max_registrations)
        .bind(form.registration_deadline)
        .bind(&form.allowed_email_domains)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(entity) = entity else {
            tx.rollback().await?;
            return Ok(None);
        };

        replace_fields_tx(&mut tx, form_id, fields).await?;

        tx.commit().await?;
        Ok(Some(entity))
    }

    /// Lists all forms with their registration counts, newest first.
    pub async fn list_with_counts(&self) -> Result<Vec<FormWithCountEntity>, sqlx::Error> {
        sqlx::query_as::<_, FormWithCountEntity>(
            r#"
            SELECT f.id, f.event_id, f.title, f.description, f.is_active,
                   f.max_registrations, f.registration_deadline, f.allowed_email_domains,
                   f.created_at, f.updated_at,
                   COUNT(r.id) AS registration_count
            FROM registration_forms f
            LEFT JOIN registrations r ON r.form_id = f.id
            GROUP BY f.id
            ORDER BY f.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Deletes a form. Fields and registrations cascade.
    ///
    /// Returns true if a form was deleted.
    pub async fn delete(&self, form_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM registration_forms WHERE id = $1")
            .bind(form_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
