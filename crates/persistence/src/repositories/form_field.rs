//! Repository for form field database operations.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::FormFieldEntity;

/// Data for one field in a form save.
#[derive(Debug, Clone)]
pub struct NewFormField {
    pub name: String,
    pub label: String,
    pub field_type: String,
    pub options: Vec<String>,
    pub required: bool,
    pub display_order: i32,
}

/// Repository for form field operations.
#[derive(Clone)]
pub struct FormFieldRepository {
    pool: PgPool,
}

impl FormFieldRepository {
    /// Creates a new form field repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists a form's fields in display order.
    pub async fn list_for_form(&self, form_id: Uuid) -> Result<Vec<FormFieldEntity>, sqlx::Error> {
        sqlx::query_as::<_, FormFieldEntity>(
            r#"
            SELECT id, form_id, name, label, field_type, options, required, display_order
            FROM form_fields
            WHERE form_id = $1
            ORDER BY display_order ASC
            "#,
        )
        .bind(form_id)
        .fetch_all(&self.pool)
        .await
    }
}

/// Replaces a form's whole field list inside an open transaction
/// (delete-all + reinsert, preserving the given order).
pub(crate) async fn replace_fields_tx(
    tx: &mut Transaction<'_, Postgres>,
    form_id: Uuid,
    fields: &[NewFormField],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM form_fields WHERE form_id = $1")
        .bind(form_id)
        .execute(&mut **tx)
        .await?;

    for (index, field) in fields.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO form_fields
                (form_id, name, label, field_type, options, required, display_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(form_id)
        .bind(&field.name)
        .bind(&field.label)
        .bind(&field.field_type)
        .bind(&field.options)
        .bind(field.required)
        .bind(index as i32)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}
