//! Canonical customer entity and the draft shape used for creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Customer record as stored in the `customers` collection.
///
/// `id` and `created_at` are assigned by the store and never set by clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    /// Store-assigned identifier.
    pub id: i64,
    /// Legal name, always present.
    pub name: String,
    /// Company name, if captured.
    #[serde(default)]
    pub company: Option<String>,
    /// 15-character GST registration number, if captured.
    #[serde(default)]
    pub gst_number: Option<String>,
    /// 10-character PAN, if captured.
    #[serde(default)]
    pub pan_number: Option<String>,
    /// Free-text postal address, if captured.
    #[serde(default)]
    pub address: Option<String>,
    /// Contact email, if captured.
    #[serde(default)]
    pub email_address: Option<String>,
    /// Contact phone, if captured.
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Store-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Draft submitted to create a customer.
///
/// Serializes without `id` or `created_at` so the store assigns both.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomerDraft {
    /// Legal name, required by the store.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gst_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Customer, CustomerDraft};
    use pretty_assertions::assert_eq;

    #[test]
    fn customer_decodes_store_columns() {
        let body = r#"{
            "id": 42,
            "name": "Acme Corporation",
            "company": "Acme Corp",
            "gst_number": "27AADCA0425P1Z7",
            "pan_number": "AADCA0425P",
            "address": "Mumbai",
            "email_address": "contact@acme.example",
            "phone_number": "9876543210",
            "created_at": "2026-07-01T09:30:00Z"
        }"#;
        let customer: Customer = serde_json::from_str(body).expect("decode");
        assert_eq!(customer.id, 42);
        assert_eq!(customer.name, "Acme Corporation");
        assert_eq!(customer.gst_number.as_deref(), Some("27AADCA0425P1Z7"));
    }

    #[test]
    fn customer_tolerates_missing_optional_columns() {
        let body = r#"{"id": 7, "name": "Initech Inc", "created_at": "2026-07-01T09:30:00Z"}"#;
        let customer: Customer = serde_json::from_str(body).expect("decode");
        assert_eq!(customer.company, None);
        assert_eq!(customer.phone_number, None);
    }

    #[test]
    fn draft_never_serializes_store_assigned_columns() {
        let draft = CustomerDraft {
            name: "Globex Corporation".to_string(),
            gst_number: Some("33AARCG7485P1Z6".to_string()),
            ..CustomerDraft::default()
        };
        let value = serde_json::to_value(&draft).expect("encode");
        let object = value.as_object().expect("object");
        assert!(!object.contains_key("id"));
        assert!(!object.contains_key("created_at"));
        assert!(!object.contains_key("company"));
        assert_eq!(object["name"], "Globex Corporation");
    }
}
