//! Registration export and analytics flattening.
//!
//! Collapses the registrations of one form into a flat table: standard
//! participant columns first, then the union of `form_data` keys, with
//! photo-valued keys split out into trailing URL columns. The same table
//! backs the on-screen analytics view and the CSV download.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::form::{FieldType, FormField};
use crate::models::registration::{FormValue, Registration};

/// Standard columns emitted before any form-specific ones.
const STANDARD_HEADERS: [&str; 6] = [
    "Name",
    "Email",
    "Phone",
    "Registration Date",
    "Status",
    "Confirmation Sent",
];

/// Substrings that identify a value as hosted on a known storage service.
const STORAGE_HOST_MARKERS: [&str; 2] = ["/storage/v1/object/public/", "supabase.co"];

/// Image extensions recognized by the photo-column heuristic.
const IMAGE_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp"];

/// A flattened projection of a form's registrations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Builds the flat table for a form's registrations.
///
/// Column layout: the standard participant columns, then every non-photo
/// `form_data` key seen across the rows (declared fields in display order,
/// undeclared keys alphabetically after them), then the photo columns.
/// Photo columns are labeled with the field's label when the key is
/// declared, otherwise with the raw key.
pub fn build_export_table(fields: &[FormField], registrations: &[Registration]) -> ExportTable {
    // Union of all form_data keys across rows.
    let mut seen_keys: BTreeSet<&str> = BTreeSet::new();
    for registration in registrations {
        for key in registration.form_data.keys() {
            seen_keys.insert(key.as_str());
        }
    }

    let declared_photo = |key: &str| {
        fields
            .iter()
            .any(|f| f.name == key && f.field_type == FieldType::Photo)
    };

    // A key is a photo column if its field is declared photo, or any of its
    // values heuristically looks like an image URL.
    let mut photo_keys: Vec<&str> = Vec::new();
    let mut data_keys: Vec<&str> = Vec::new();
    for key in &seen_keys {
        let heuristic_photo = registrations.iter().any(|r| {
            matches!(r.form_data.get(*key), Some(FormValue::Text(v)) if looks_like_image_url(v))
        });
        if declared_photo(key) || heuristic_photo {
            photo_keys.push(key);
        } else {
            data_keys.push(key);
        }
    }

    // Declared fields keep their display order; undeclared keys trail
    // alphabetically (BTreeSet already sorted them).
    let declared_position = |key: &str| {
        fields
            .iter()
            .find(|f| f.name == key)
            .map(|f| f.display_order)
    };
    data_keys.sort_by_key(|key| (declared_position(key).is_none(), declared_position(key)));
    photo_keys.sort_by_key(|key| (declared_position(key).is_none(), declared_position(key)));

    let label_for = |key: &str| {
        fields
            .iter()
            .find(|f| f.name == key)
            .map(|f| f.label.clone())
            .unwrap_or_else(|| key.to_string())
    };

    let mut headers: Vec<String> = STANDARD_HEADERS.iter().map(|h| h.to_string()).collect();
    headers.extend(data_keys.iter().map(|k| label_for(k)));
    headers.extend(photo_keys.iter().map(|k| label_for(k)));

    let rows = registrations
        .iter()
        .map(|r| {
            let mut row = vec![
                r.participant_name.clone(),
                r.participant_email.clone(),
                r.participant_phone.clone().unwrap_or_default(),
                r.registration_date.format("%Y-%m-%d %H:%M:%S").to_string(),
                r.status.as_str().to_string(),
                if r.confirmation_sent { "yes" } else { "no" }.to_string(),
            ];
            for key in &data_keys {
                row.push(r.form_data.get(*key).map(value_to_cell).unwrap_or_default());
            }
            for key in &photo_keys {
                // Photo columns carry the raw URL
                row.push(match r.form_data.get(*key) {
                    Some(FormValue::Text(url)) => url.clone(),
                    Some(other) => value_to_cell(other),
                    None => String::new(),
                });
            }
            row
        })
        .collect();

    ExportTable { headers, rows }
}

/// Renders the table as CSV: UTF-8, comma-delimited, every cell quoted
/// with internal quotes doubled.
pub fn to_csv(table: &ExportTable) -> String {
    let mut csv = String::new();
    csv.push_str(&quote_row(&table.headers));
    csv.push('\n');
    for row in &table.rows {
        csv.push_str(&quote_row(row));
        csv.push('\n');
    }
    csv
}

/// The download filename: `registrations_<form_title>_<ISO_date>.csv`.
pub fn export_filename(form_title: &str, date: NaiveDate) -> String {
    let title: String = form_title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("registrations_{}_{}.csv", title, date.format("%Y-%m-%d"))
}

fn quote_row(cells: &[String]) -> String {
    cells
        .iter()
        .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}

fn value_to_cell(value: &FormValue) -> String {
    match value {
        FormValue::Text(s) => s.clone(),
        FormValue::Multi(items) => items.join("; "),
        FormValue::Flag(b) => b.to_string(),
    }
}

/// Heuristic photo detection: an http(s) URL ending in a known image
/// extension, or hosted on a known storage service.
fn looks_like_image_url(value: &str) -> bool {
    if !value.starts_with("http") {
        return false;
    }
    let lower = value.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
        || STORAGE_HOST_MARKERS.iter().any(|m| lower.contains(m))
}
