//! Common validation utilities.

use validator::ValidationError;

lazy_static::lazy_static! {
    /// Loose phone format: optional leading +, then 7-15 digits with
    /// optional separators. Matches what participants actually type.
    static ref PHONE_REGEX: regex::Regex =
        regex::Regex::new(r"^\+?[0-9][0-9 \-]{5,18}[0-9]$").unwrap();
}

/// Validates that a phone number is plausible (7-20 chars, digits with
/// optional `+`, spaces, and dashes).
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_REGEX.is_match(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Invalid phone number format".into());
        Err(err)
    }
}

/// Checks an email against a domain allow-list using a case-insensitive
/// suffix match, exactly as the registration forms define it.
///
/// An empty allow-list accepts every email. Entries are expected to carry
/// their leading `@` (e.g. `@college.edu`), but a missing one is tolerated.
pub fn email_domain_allowed(email: &str, allowed_domains: &[String]) -> bool {
    if allowed_domains.is_empty() {
        return true;
    }

    let email = email.to_lowercase();
    allowed_domains.iter().any(|domain| {
        let domain = domain.trim().to_lowercase();
        if domain.is_empty() {
            return false;
        }
        if domain.starts_with('@') {
            email.ends_with(&domain)
        } else {
            email.ends_with(&format!("@{}", domain))
        }
    })
}

/// Validates that a field name is a sane identifier: lowercase ASCII
/// letters, digits, and underscores, starting with a letter.
pub fn validate_field_name(name: &str) -> Result<(), ValidationError> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && name.len() <= 64;

    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("field_name");
        err.message =
            Some("Field names must be lowercase identifiers (letters, digits, underscores)".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone_accepts_common_formats() {
        assert!(validate_phone("+91 98765 43210").is_ok());
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("022-2754-6100").is_ok());
    }

    #[test]
    fn test_validate_phone_rejects_garbage() {
        assert!(validate_phone("not a phone").is_err());
        assert!(validate_phone("123").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn test_email_domain_allowed_empty_list_accepts_all() {
        assert!(email_domain_allowed("anyone@gmail.com", &[]));
    }

    #[test]
    fn test_email_domain_allowed_suffix_match() {
        let allowed = vec!["@college.edu".to_string()];
        assert!(email_domain_allowed("user@college.edu", &allowed));
        assert!(!email_domain_allowed("user@gmail.com", &allowed));
    }

    #[test]
    fn test_email_domain_allowed_is_case_insensitive() {
        let allowed = vec!["@College.Edu".to_string()];
        assert!(email_domain_allowed("USER@COLLEGE.EDU", &allowed));
    }

    #[test]
    fn test_email_domain_allowed_tolerates_missing_at() {
        let allowed = vec!["college.edu".to_string()];
        assert!(email_domain_allowed("user@college.edu", &allowed));
        // Suffix match must not accept a bare substring elsewhere
        assert!(!email_domain_allowed("user@college.edu.evil.com", &allowed));
    }

    #[test]
    fn test_validate_field_name() {
        assert!(validate_field_name("college_name").is_ok());
        assert!(validate_field_name("photo_id").is_ok());
        assert!(validate_field_name("CollegeName").is_err());
        assert!(validate_field_name("1st_field").is_err());
        assert!(validate_field_name("").is_err());
    }
}
