//! Submission orchestration.
//!
//! Ties the pure validation checks to the store and the collaborators:
//! loads the form and its fields, runs the checks in their fixed order,
//! uploads any photos, persists the registration, and sends the
//! confirmation mail best-effort.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    FieldType, FormValue, Registration, SubmitRegistrationRequest, MAX_PHOTO_BYTES,
};
use domain::services::submission::{
    check_capacity, check_deadline, check_duplicate, check_email_domain, check_form_active,
    check_option_values, check_required_fields, SubmissionRejection,
};
use persistence::repositories::{
    FormFieldRepository, FormRepository, NewRegistration, RegistrationRepository,
};

use crate::error::ApiError;
use crate::middleware::metrics::{record_registration_accepted, record_registration_rejected};
use crate::services::mail::{confirmation_mail, MailClient};
use crate::services::storage::PhotoUploader;

/// Result of a successful submission.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub registration: Registration,
    pub confirmation_sent: bool,
}

/// Orchestrates public form submissions.
#[derive(Clone)]
pub struct SubmissionService {
    forms: FormRepository,
    fields: FormFieldRepository,
    registrations: RegistrationRepository,
    uploader: Option<PhotoUploader>,
    mail: MailClient,
}

impl SubmissionService {
    pub fn new(
        forms: FormRepository,
        fields: FormFieldRepository,
        registrations: RegistrationRepository,
        uploader: Option<PhotoUploader>,
        mail: MailClient,
    ) -> Self {
        Self {
            forms,
            fields,
            registrations,
            uploader,
            mail,
        }
    }

    /// Validates and persists one submission.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// active flag, deadline, capacity, required fields, option values,
    /// email domain, duplicate. Photos are decoded, size-checked and
    /// uploaded only after every check passes, so rejected submissions
    /// never leave orphaned objects in storage.
    pub async fn submit(
        &self,
        form_id: Uuid,
        request: SubmitRegistrationRequest,
    ) -> Result<SubmissionOutcome, ApiError> {
        request.validate()?;

        let form_entity = self
            .forms
            .find_by_id(form_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Form not found".to_string()))?;
        let form: domain::models::RegistrationForm = form_entity.into();

        let fields: Vec<domain::models::FormField> = self
            .fields
            .list_for_form(form_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        self.reject(check_form_active(&form))?;
        self.reject(check_deadline(&form, Utc::now()))?;

        let existing = self.registrations.count_for_form(form_id).await?;
        self.reject(check_capacity(&form, existing))?;
        self.reject(check_required_fields(&fields, &request))?;
        self.reject(check_option_values(&fields, &request))?;
        self.reject(check_email_domain(&form, &request.participant_email))?;

        let duplicate = self
            .registrations
            .duplicate_exists(
                form_id,
                &request.participant_email,
                request.participant_phone.as_deref(),
            )
            .await?;
        self.reject(check_duplicate(duplicate))?;

        let mut form_data = request.form_data.clone();
        self.upload_photos(&form, &fields, &request, &mut form_data)
            .await?;

        let entity = self
            .registrations
            .insert(NewRegistration {
                form_id,
                event_id: form.event_id,
                participant_name: request.participant_name.clone(),
                participant_email: request.participant_email.clone(),
                participant_phone: request.participant_phone.clone(),
                form_data: serde_json::to_value(&form_data)
                    .map_err(|e| ApiError::Internal(e.to_string()))?,
            })
            .await
            .map_err(|e| {
                // A lost duplicate race surfaces here as a unique violation
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.code().as_deref() == Some("23505") {
                        record_registration_rejected("duplicate");
                    }
                }
                ApiError::from(e)
            })?;

        let registration: Registration = entity.into();
        record_registration_accepted();
        info!(
            registration_id = %registration.id,
            form_id = %form_id,
            "Registration accepted"
        );

        let confirmation_sent = self.send_confirmation(&form.title, &registration).await;

        Ok(SubmissionOutcome {
            registration,
            confirmation_sent,
        })
    }

    /// Decodes, size-checks and uploads the request's photos, writing each
    /// resulting public URL into `form_data` under the field's name.
    async fn upload_photos(
        &self,
        form: &domain::models::RegistrationForm,
        fields: &[domain::models::FormField],
        request: &SubmitRegistrationRequest,
        form_data: &mut HashMap<String, FormValue>,
    ) -> Result<(), ApiError> {
        for field in fields {
            if field.field_type != FieldType::Photo {
                continue;
            }
            let Some(photo) = request.photos.get(&field.name) else {
                continue;
            };

            let bytes = decode_photo(field, photo)?;

            let uploader = self.uploader.as_ref().ok_or_else(|| {
                ApiError::ServiceUnavailable("Photo storage is not configured".to_string())
            })?;

            let url = uploader
                .upload_photo(form.id, &field.name, photo, &bytes)
                .await
                .map_err(|e| ApiError::ServiceUnavailable(e.to_string()))?;

            form_data.insert(field.name.clone(), FormValue::Text(url));
        }
        Ok(())
    }

    /// Sends the confirmation mail best-effort. A mail failure never fails
    /// the submission; it leaves `confirmation_sent` false for the admin
    /// view to surface.
    async fn send_confirmation(&self, form_title: &str, registration: &Registration) -> bool {
        if !self.mail.is_enabled() {
            return false;
        }

        let (subject, message) = confirmation_mail(form_title, &registration.participant_name);
        match self
            .mail
            .send(&registration.participant_email, &subject, &message)
            .await
        {
            Ok(()) => {
                if let Err(e) = self
                    .registrations
                    .set_confirmation_sent(registration.id, true)
                    .await
                {
                    warn!(
                        registration_id = %registration.id,
                        error = %e,
                        "Failed to record confirmation flag"
                    );
                }
                true
            }
            Err(e) => {
                warn!(
                    registration_id = %registration.id,
                    error = %e,
                    "Confirmation mail failed; registration kept"
                );
                false
            }
        }
    }

    fn reject(&self, result: Result<(), SubmissionRejection>) -> Result<(), ApiError> {
        result.map_err(|rejection| {
            record_registration_rejected(rejection_reason(&rejection));
            ApiError::from(rejection)
        })
    }
}

/// Decodes a photo payload and re-checks the size cap server-side.
///
/// The cap advertised by the renderer is advisory; the decoded byte
/// count is what counts here.
fn decode_photo(
    field: &domain::models::FormField,
    photo: &domain::models::PhotoUpload,
) -> Result<Vec<u8>, ApiError> {
    let bytes = photo.decode().map_err(|_| {
        ApiError::Validation(format!("Photo '{}' is not valid base64", field.label))
    })?;

    if bytes.len() > MAX_PHOTO_BYTES {
        record_registration_rejected("photo_too_large");
        return Err(SubmissionRejection::PhotoTooLarge {
            label: field.label.clone(),
        }
        .into());
    }

    Ok(bytes)
}

/// Stable metric label for each rejection kind.
fn rejection_reason(rejection: &SubmissionRejection) -> &'static str {
    match rejection {
        SubmissionRejection::FormClosed => "form_closed",
        SubmissionRejection::DeadlinePassed => "deadline_passed",
        SubmissionRejection::CapacityReached => "capacity_reached",
        SubmissionRejection::MissingField { .. } => "missing_field",
        SubmissionRejection::MissingPhoto { .. } => "missing_photo",
        SubmissionRejection::EmailDomainNotAllowed { .. } => "email_domain",
        SubmissionRejection::DuplicateRegistration => "duplicate",
        SubmissionRejection::PhotoTooLarge { .. } => "photo_too_large",
        SubmissionRejection::UnknownOption { .. } => "unknown_option",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use domain::models::{FormField, PhotoUpload};

    fn photo_field() -> FormField {
        FormField {
            id: Uuid::new_v4(),
            form_id: Uuid::new_v4(),
            name: "id_photo".to_string(),
            label: "ID Photo".to_string(),
            field_type: FieldType::Photo,
            options: vec![],
            required: true,
            display_order: 0,
        }
    }

    fn upload(bytes: &[u8]) -> PhotoUpload {
        PhotoUpload {
            file_name: "id.jpg".to_string(),
            content_type: Some("image/jpeg".to_string()),
            data_base64: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    #[test]
    fn test_photo_within_cap_decodes() {
        let bytes = decode_photo(&photo_field(), &upload(&[7u8; 1024])).unwrap();
        assert_eq!(bytes.len(), 1024);
    }

    #[test]
    fn test_oversized_photo_rejected_after_decoding() {
        let payload = vec![0u8; MAX_PHOTO_BYTES + 1];
        let err = decode_photo(&photo_field(), &upload(&payload)).unwrap_err();
        match err {
            ApiError::Validation(message) => assert!(message.contains("5 MB")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_photo_payload_rejected() {
        let photo = PhotoUpload {
            file_name: "id.jpg".to_string(),
            content_type: None,
            data_base64: "not base64!!".to_string(),
        };
        let err = decode_photo(&photo_field(), &photo).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_rejection_reasons_are_distinct() {
        let reasons = [
            rejection_reason(&SubmissionRejection::FormClosed),
            rejection_reason(&SubmissionRejection::DeadlinePassed),
            rejection_reason(&SubmissionRejection::CapacityReached),
            rejection_reason(&SubmissionRejection::DuplicateRegistration),
        ];
        let unique: std::collections::HashSet<_> = reasons.iter().collect();
        assert_eq!(unique.len(), reasons.len());
    }
}
