//! Submission validation.
//!
//! Gates a submission before it is persisted. The checks run in a fixed
//! order and each short-circuits with its own user-facing message:
//! active flag, deadline, capacity, required fields, email domain
//! allow-list, duplicate detection. The functions here are pure; the API
//! layer supplies the counts and duplicate lookups from the store.
//!
//! Duplicate detection is additionally backed by unique indexes in the
//! store, so two concurrent submissions that both pass the pre-check can
//! no longer both insert.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::form::{FieldType, FormField, RegistrationForm};
use crate::models::registration::SubmitRegistrationRequest;

use shared::validation::email_domain_allowed;

/// Why a submission was rejected. Each variant renders the message shown
/// to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionRejection {
    #[error("Registration for this form is closed")]
    FormClosed,

    #[error("The registration deadline has passed")]
    DeadlinePassed,

    #[error("This event has reached its registration capacity")]
    CapacityReached,

    #[error("'{label}' is required")]
    MissingField { label: String },

    #[error("'{label}' requires a photo to be attached")]
    MissingPhoto { label: String },

    #[error("Registrations are restricted to email addresses from: {domains}")]
    EmailDomainNotAllowed { domains: String },

    #[error("A registration with this email or phone number already exists for this event")]
    DuplicateRegistration,

    #[error("Photo '{label}' exceeds the 5 MB size limit")]
    PhotoTooLarge { label: String },

    #[error("Unknown option '{value}' for field '{label}'")]
    UnknownOption { label: String, value: String },
}

/// Check 1: the form must be active.
pub fn check_form_active(form: &RegistrationForm) -> Result<(), SubmissionRejection> {
    if form.is_active {
        Ok(())
    } else {
        Err(SubmissionRejection::FormClosed)
    }
}

/// Check 2: the deadline, when set, must not be in the past.
pub fn check_deadline(
    form: &RegistrationForm,
    now: DateTime<Utc>,
) -> Result<(), SubmissionRejection> {
    match form.registration_deadline {
        Some(deadline) if deadline < now => Err(SubmissionRejection::DeadlinePassed),
        _ => Ok(()),
    }
}

/// Check 3: the capacity ceiling, when set, must not be reached.
///
/// `existing_count` is the number of registrations already stored for the
/// form; at or over capacity rejects before any insert.
pub fn check_capacity(
    form: &RegistrationForm,
    existing_count: i64,
) -> Result<(), SubmissionRejection> {
    match form.max_registrations {
        Some(max) if existing_count >= max as i64 => Err(SubmissionRejection::CapacityReached),
        _ => Ok(()),
    }
}

/// Check 4: every required field must be answered.
///
/// For `photo` fields, "answered" means a file was attached; a value in
/// `form_data` under the same key does not count.
pub fn check_required_fields(
    fields: &[FormField],
    request: &SubmitRegistrationRequest,
) -> Result<(), SubmissionRejection> {
    for field in fields {
        if !field.required {
            continue;
        }

        if field.field_type == FieldType::Photo {
            if !request.photos.contains_key(&field.name) {
                return Err(SubmissionRejection::MissingPhoto {
                    label: field.label.clone(),
                });
            }
            continue;
        }

        let answered = request
            .form_data
            .get(&field.name)
            .map(|value| !value.is_empty())
            .unwrap_or(false);
        if !answered {
            return Err(SubmissionRejection::MissingField {
                label: field.label.clone(),
            });
        }
    }
    Ok(())
}

/// Check 5: the email must match the allow-list (case-insensitive suffix
/// match). An empty allow-list accepts every email.
pub fn check_email_domain(
    form: &RegistrationForm,
    email: &str,
) -> Result<(), SubmissionRejection> {
    if email_domain_allowed(email, &form.allowed_email_domains) {
        Ok(())
    } else {
        Err(SubmissionRejection::EmailDomainNotAllowed {
            domains: form.allowed_email_domains.join(", "),
        })
    }
}

/// Check 6: no existing registration may match this email or phone.
///
/// The caller queries the store for a match; the unique indexes close the
/// window this pre-check cannot.
pub fn check_duplicate(duplicate_exists: bool) -> Result<(), SubmissionRejection> {
    if duplicate_exists {
        Err(SubmissionRejection::DuplicateRegistration)
    } else {
        Ok(())
    }
}

/// Values submitted for select fields must be one of the declared options;
/// checkbox selections must all be declared.
pub fn check_option_values(
    fields: &[FormField],
    request: &SubmitRegistrationRequest,
) -> Result<(), SubmissionRejection> {
    use crate::models::registration::FormValue;

    for field in fields {
        if !field.field_type.needs_options() {
            continue;
        }
        let Some(value) = request.form_data.get(&field.name) else {
            continue;
        };
        let unknown = match value {
            FormValue::Text(s) if !s.trim().is_empty() => {
                (!field.options.iter().any(|o| o == s)).then(|| s.clone())
            }
            FormValue::Multi(items) => items
                .iter()
                .find(|item| !field.options.iter().any(|o| &o == item))
                .map(|item| item.to_string()),
            _ => None,
        };
        if let Some(value) = unknown {
            return Err(SubmissionRejection::UnknownOption {
                label: field.label.clone(),
                value,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::registration::{FormValue, PhotoUpload};
    use std::collections::HashMap;
    use uuid::Uuid;

    fn test_form() -> RegistrationForm {
        RegistrationForm {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            title: "Hackathon 2025".to_string(),
            description: None,
            is_active: true,
            max_registrations: None,
            registration_deadline: None,
            allowed_email_domains: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_field(name: &str, label: &str, field_type: FieldType, required: bool) -> FormField {
        FormField {
            id: Uuid::new_v4(),
            form_id: Uuid::new_v4(),
            name: name.to_string(),
            label: label.to_string(),
            field_type,
            options: vec![],
            required,
            display_order: 0,
        }
    }

    fn test_request() -> SubmitRegistrationRequest {
        SubmitRegistrationRequest {
            participant_name: "Asha Patil".to_string(),
            participant_email: "asha@college.edu".to_string(),
            participant_phone: None,
            form_data: HashMap::new(),
            photos: HashMap::new(),
        }
    }

    #[test]
    fn test_inactive_form_rejected_as_closed() {
        let mut form = test_form();
        form.is_active = false;
        assert_eq!(
            check_form_active(&form),
            Err(SubmissionRejection::FormClosed)
        );
    }

    #[test]
    fn test_past_deadline_rejects_regardless_of_other_validity() {
        let mut form = test_form();
        form.registration_deadline = Some(Utc::now() - chrono::Duration::hours(1));
        assert_eq!(
            check_deadline(&form, Utc::now()),
            Err(SubmissionRejection::DeadlinePassed)
        );

        form.registration_deadline = Some(Utc::now() + chrono::Duration::hours(1));
        assert!(check_deadline(&form, Utc::now()).is_ok());
    }

    #[test]
    fn test_capacity_ceiling_rejects_at_capacity() {
        let mut form = test_form();
        form.max_registrations = Some(2);
        assert!(check_capacity(&form, 0).is_ok());
        assert!(check_capacity(&form, 1).is_ok());
        assert_eq!(
            check_capacity(&form, 2),
            Err(SubmissionRejection::CapacityReached)
        );
        assert_eq!(
            check_capacity(&form, 3),
            Err(SubmissionRejection::CapacityReached)
        );
    }

    #[test]
    fn test_unlimited_capacity_accepts_any_count() {
        let form = test_form();
        assert!(check_capacity(&form, 10_000).is_ok());
    }

    #[test]
    fn test_required_field_gate_names_the_label() {
        let fields = vec![test_field("college", "College Name", FieldType::Text, true)];
        let request = test_request();

        let err = check_required_fields(&fields, &request).unwrap_err();
        assert_eq!(
            err,
            SubmissionRejection::MissingField {
                label: "College Name".to_string()
            }
        );
        assert!(err.to_string().contains("College Name"));
    }

    #[test]
    fn test_required_field_satisfied_by_nonempty_value() {
        let fields = vec![test_field("college", "College Name", FieldType::Text, true)];
        let mut request = test_request();
        request
            .form_data
            .insert("college".to_string(), FormValue::Text("City College".to_string()));
        assert!(check_required_fields(&fields, &request).is_ok());
    }

    #[test]
    fn test_blank_value_does_not_satisfy_required_field() {
        let fields = vec![test_field("college", "College Name", FieldType::Text, true)];
        let mut request = test_request();
        request
            .form_data
            .insert("college".to_string(), FormValue::Text("   ".to_string()));
        assert!(check_required_fields(&fields, &request).is_err());
    }

    #[test]
    fn test_required_photo_needs_attachment_not_form_data() {
        let fields = vec![test_field("photo_id", "ID Photo", FieldType::Photo, true)];
        let mut request = test_request();
        // A stray falsy value under the photo key must not count as present
        request
            .form_data
            .insert("photo_id".to_string(), FormValue::Text(String::new()));

        let err = check_required_fields(&fields, &request).unwrap_err();
        assert_eq!(
            err,
            SubmissionRejection::MissingPhoto {
                label: "ID Photo".to_string()
            }
        );

        request.photos.insert(
            "photo_id".to_string(),
            PhotoUpload {
                file_name: "id.jpg".to_string(),
                content_type: None,
                data_base64: "aGk=".to_string(),
            },
        );
        assert!(check_required_fields(&fields, &request).is_ok());
    }

    #[test]
    fn test_email_domain_allow_list() {
        let mut form = test_form();
        form.allowed_email_domains = vec!["@college.edu".to_string()];

        assert!(check_email_domain(&form, "user@college.edu").is_ok());
        assert!(check_email_domain(&form, "USER@COLLEGE.EDU").is_ok());

        let err = check_email_domain(&form, "user@gmail.com").unwrap_err();
        assert!(matches!(
            err,
            SubmissionRejection::EmailDomainNotAllowed { .. }
        ));
    }

    #[test]
    fn test_duplicate_rejection() {
        assert!(check_duplicate(false).is_ok());
        assert_eq!(
            check_duplicate(true),
            Err(SubmissionRejection::DuplicateRegistration)
        );
    }

    #[test]
    fn test_option_values_must_be_declared() {
        let mut field = test_field("year", "Year of Study", FieldType::Select, true);
        field.options = vec!["FE".to_string(), "SE".to_string()];
        let fields = vec![field];

        let mut request = test_request();
        request
            .form_data
            .insert("year".to_string(), FormValue::Text("PhD".to_string()));
        assert!(matches!(
            check_option_values(&fields, &request),
            Err(SubmissionRejection::UnknownOption { .. })
        ));

        request
            .form_data
            .insert("year".to_string(), FormValue::Text("SE".to_string()));
        assert!(check_option_values(&fields, &request).is_ok());
    }
}
