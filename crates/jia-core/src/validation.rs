//! Field-level validation for customer drafts.

use jia_protocol::CustomerDraft;
use regex::Regex;
use std::collections::BTreeMap;

/// GST registration number: 2 digits, 5 letters, 4 digits, 1 letter,
/// 1 alphanumeric, literal `Z`, 1 alphanumeric.
const GST_PATTERN: &str = r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][0-9A-Z]Z[0-9A-Z]$";
/// PAN: 5 letters, 4 digits, 1 letter.
const PAN_PATTERN: &str = r"^[A-Z]{5}[0-9]{4}[A-Z]$";

/// Editable fields of the onboarding draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormField {
    Name,
    Company,
    GstNumber,
    PanNumber,
    Address,
    EmailAddress,
    PhoneNumber,
}

impl FormField {
    /// Column-style name used in error maps and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Company => "company",
            FormField::GstNumber => "gst_number",
            FormField::PanNumber => "pan_number",
            FormField::Address => "address",
            FormField::EmailAddress => "email_address",
            FormField::PhoneNumber => "phone_number",
        }
    }
}

/// Validate one field value, returning the error message if invalid.
///
/// Optional fields accept blank values; patterns apply only when a value
/// is present.
pub fn validate_field(field: FormField, value: &str) -> Option<String> {
    let value = value.trim();
    match field {
        FormField::Name => value
            .is_empty()
            .then(|| "Customer name is required".to_string()),
        FormField::GstNumber => (!value.is_empty() && !gst_is_valid(value)).then(|| {
            "GST number must match the 15-character format (e.g. 27AADCA0425P1Z7)".to_string()
        }),
        FormField::PanNumber => (!value.is_empty() && !pan_is_valid(value))
            .then(|| "PAN must match the 10-character format (e.g. AADCA0425P)".to_string()),
        FormField::EmailAddress => (!value.is_empty() && !email_is_valid(value))
            .then(|| "Email address is not valid".to_string()),
        FormField::PhoneNumber => (!value.is_empty() && !phone_is_valid(value))
            .then(|| "Phone number must be 10 to 13 digits".to_string()),
        FormField::Company | FormField::Address => None,
    }
}

/// Validate a whole draft, returning field-scoped errors.
pub fn validate_draft(draft: &CustomerDraft) -> BTreeMap<FormField, String> {
    let mut errors = BTreeMap::new();
    let fields = [
        (FormField::Name, draft.name.as_str()),
        (FormField::Company, optional(&draft.company)),
        (FormField::GstNumber, optional(&draft.gst_number)),
        (FormField::PanNumber, optional(&draft.pan_number)),
        (FormField::Address, optional(&draft.address)),
        (FormField::EmailAddress, optional(&draft.email_address)),
        (FormField::PhoneNumber, optional(&draft.phone_number)),
    ];
    for (field, value) in fields {
        if let Some(message) = validate_field(field, value) {
            errors.insert(field, message);
        }
    }
    errors
}

fn optional(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

fn gst_is_valid(value: &str) -> bool {
    let Ok(pattern) = Regex::new(GST_PATTERN) else {
        return false;
    };
    pattern.is_match(value)
}

fn pan_is_valid(value: &str) -> bool {
    let Ok(pattern) = Regex::new(PAN_PATTERN) else {
        return false;
    };
    pattern.is_match(value)
}

/// Exactly one `@`, a non-empty local part, and a domain with at least one
/// dot separating non-empty labels.
fn email_is_valid(value: &str) -> bool {
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}

/// Digit-length check: separators stripped, one optional leading `+`,
/// 10 to 13 digits.
fn phone_is_valid(value: &str) -> bool {
    let stripped: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    let digits = stripped.strip_prefix('+').unwrap_or(&stripped);
    (10..=13).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::{FormField, validate_draft, validate_field};
    use jia_protocol::CustomerDraft;
    use pretty_assertions::assert_eq;

    #[test]
    fn gst_accepts_the_documented_format() {
        assert_eq!(validate_field(FormField::GstNumber, "27AADCA0425P1Z7"), None);
        assert_eq!(validate_field(FormField::GstNumber, "06AABCW5896P1Z3"), None);
    }

    #[test]
    fn gst_rejects_malformed_values() {
        assert!(validate_field(FormField::GstNumber, "123").is_some());
        assert!(validate_field(FormField::GstNumber, "BADGST").is_some());
        // wrong fixed letter where `Z` is required
        assert!(validate_field(FormField::GstNumber, "27AADCA0425P1X7").is_some());
        assert!(validate_field(FormField::GstNumber, "27aadca0425p1z7").is_some());
    }

    #[test]
    fn pan_accepts_and_rejects() {
        assert_eq!(validate_field(FormField::PanNumber, "AADCA0425P"), None);
        assert!(validate_field(FormField::PanNumber, "AADCA0425").is_some());
        assert!(validate_field(FormField::PanNumber, "12345ABCDE").is_some());
    }

    #[test]
    fn email_requires_one_at_and_dotted_domain() {
        assert_eq!(
            validate_field(FormField::EmailAddress, "contact@acme.example"),
            None
        );
        assert!(validate_field(FormField::EmailAddress, "contact.acme.example").is_some());
        assert!(validate_field(FormField::EmailAddress, "a@b@c.example").is_some());
        assert!(validate_field(FormField::EmailAddress, "contact@acme").is_some());
        assert!(validate_field(FormField::EmailAddress, "contact@acme.").is_some());
    }

    #[test]
    fn phone_checks_digit_length_after_separators() {
        assert_eq!(validate_field(FormField::PhoneNumber, "9876543210"), None);
        assert_eq!(validate_field(FormField::PhoneNumber, "+91 98765 43210"), None);
        assert!(validate_field(FormField::PhoneNumber, "12345").is_some());
        assert!(validate_field(FormField::PhoneNumber, "98765abc10").is_some());
    }

    #[test]
    fn blank_optional_fields_pass() {
        assert_eq!(validate_field(FormField::GstNumber, ""), None);
        assert_eq!(validate_field(FormField::PanNumber, "  "), None);
        assert_eq!(validate_field(FormField::EmailAddress, ""), None);
        assert_eq!(validate_field(FormField::PhoneNumber, ""), None);
    }

    #[test]
    fn draft_errors_are_field_scoped() {
        let draft = CustomerDraft {
            name: String::new(),
            gst_number: Some("BADGST".to_string()),
            email_address: Some("ok@acme.example".to_string()),
            ..CustomerDraft::default()
        };
        let errors = validate_draft(&draft);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains_key(&FormField::Name));
        assert!(errors.contains_key(&FormField::GstNumber));
        assert!(!errors.contains_key(&FormField::EmailAddress));
    }
}
