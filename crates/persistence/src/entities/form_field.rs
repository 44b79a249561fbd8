//! Form field entity (database row mapping).

use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{FieldType, FormField};

/// Database row mapping for the form_fields table.
///
/// `field_type` is stored as text; unrecognized values degrade to a plain
/// text field when converted to the domain type.
#[derive(Debug, Clone, FromRow)]
pub struct FormFieldEntity {
    pub id: Uuid,
    pub form_id: Uuid,
    pub name: String,
    pub label: String,
    pub field_type: String,
    pub options: Vec<String>,
    pub required: bool,
    pub display_order: i32,
}

impl From<FormFieldEntity> for FormField {
    fn from(entity: FormFieldEntity) -> Self {
        Self {
            id: entity.id,
            form_id: entity.form_id,
            name: entity.name,
            label: entity.label,
            field_type: FieldType::parse_or_text(&entity.field_type),
            options: entity.options,
            required: entity.required,
            display_order: entity.display_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_field_type_degrades_to_text() {
        let entity = FormFieldEntity {
            id: Uuid::new_v4(),
            form_id: Uuid::new_v4(),
            name: "legacy".to_string(),
            label: "Legacy".to_string(),
            field_type: "signature".to_string(),
            options: vec![],
            required: false,
            display_order: 0,
        };
        let field: FormField = entity.into();
        assert_eq!(field.field_type, FieldType::Text);
    }
}
