//! Assistant HTTP wire shapes and the tagged reply classification.

use crate::customer::{Customer, CustomerDraft};
use serde::{Deserialize, Serialize};

/// Status tag carried on every assistant response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssistantStatus {
    /// Exactly one customer matched a chat query.
    FoundSingle,
    /// Several customers matched a chat query.
    FoundMultiple,
    /// A prior ambiguous query was narrowed to one customer.
    DisambiguationResolved,
    /// Chat query matched a customer already on file.
    ExistingCustomerChat,
    /// No customer matched the chat query.
    NotFound,
    /// Uploaded card matched a customer already on file.
    ExistingCustomerCard,
    /// Uploaded card extracted cleanly but matched nobody.
    NewCustomerCard,
    /// Card OCR/extraction failed.
    ExtractionFailedCard,
    /// Service-reported failure.
    Error,
    /// Conversational greeting, no data attached.
    Greeting,
    /// Synthesized locally when transport or conversion fails.
    ErrorResponse,
    /// Fallback for tags this client does not know.
    #[serde(other)]
    Unknown,
}

impl AssistantStatus {
    /// Return the tag as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssistantStatus::FoundSingle => "found_single",
            AssistantStatus::FoundMultiple => "found_multiple",
            AssistantStatus::DisambiguationResolved => "disambiguation_resolved",
            AssistantStatus::ExistingCustomerChat => "existing_customer_chat",
            AssistantStatus::NotFound => "not_found",
            AssistantStatus::ExistingCustomerCard => "existing_customer_card",
            AssistantStatus::NewCustomerCard => "new_customer_card",
            AssistantStatus::ExtractionFailedCard => "extraction_failed_card",
            AssistantStatus::Error => "error",
            AssistantStatus::Greeting => "greeting",
            AssistantStatus::ErrorResponse => "error_response",
            AssistantStatus::Unknown => "unknown",
        }
    }

    /// Statuses that report a failure rather than a result.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            AssistantStatus::Error
                | AssistantStatus::ErrorResponse
                | AssistantStatus::ExtractionFailedCard
        )
    }

    /// Statuses whose follow-up offers creating a new customer.
    pub fn is_creation_eligible(&self) -> bool {
        matches!(
            self,
            AssistantStatus::NotFound | AssistantStatus::NewCustomerCard
        )
    }
}

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Free-text user message.
    pub message: String,
}

/// Response body for `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Status tag from the fixed vocabulary.
    pub status: AssistantStatus,
    /// Human-readable message to show in the transcript.
    #[serde(default)]
    pub message: String,
    /// Single matched customer, when the status carries one.
    #[serde(default)]
    pub customer_data: Option<Customer>,
    /// Candidate customers, when the status carries several.
    #[serde(default)]
    pub customers: Option<Vec<Customer>>,
    /// Extracted field map, when the status carries one.
    #[serde(default)]
    pub extracted_data: Option<ExtractedCard>,
}

/// Response body for `POST /api/upload-card`.
#[derive(Debug, Clone, Deserialize)]
pub struct CardUploadResponse {
    /// Status tag from the card vocabulary.
    pub status: AssistantStatus,
    /// Human-readable message to show in the transcript.
    #[serde(default)]
    pub message: String,
    /// Matched customer for `existing_customer_card`.
    #[serde(default)]
    pub matched_customer: Option<Customer>,
    /// Extracted field map for `new_customer_card`.
    #[serde(default)]
    pub extracted_data: Option<ExtractedCard>,
    /// Partial OCR text reported on extraction failure.
    #[serde(default)]
    pub raw_text: Option<String>,
}

/// Fields extracted from a business card image.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExtractedCard {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub gst_number: Option<String>,
    #[serde(default)]
    pub pan_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Raw OCR text the fields were pulled from.
    #[serde(default)]
    pub raw_text: Option<String>,
}

impl ExtractedCard {
    /// Seed a creation draft from the extracted fields.
    pub fn to_draft(&self) -> CustomerDraft {
        CustomerDraft {
            name: self.name.clone().unwrap_or_default(),
            company: self.company.clone(),
            gst_number: self.gst_number.clone(),
            pan_number: self.pan_number.clone(),
            address: self.address.clone(),
            email_address: self.email_address.clone(),
            phone_number: self.phone_number.clone(),
        }
    }
}

/// One assistant response, classified so each variant carries only the
/// fields valid for its status tag.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantReply {
    /// Message with no attached data (greeting, unknown tags, or a
    /// match-status whose payload was missing from the body).
    Plain {
        status: AssistantStatus,
        message: String,
    },
    /// Exactly one matched customer.
    SingleMatch {
        status: AssistantStatus,
        message: String,
        customer: Customer,
    },
    /// Several candidates needing disambiguation.
    MultipleMatches {
        message: String,
        candidates: Vec<Customer>,
    },
    /// No match; onboarding may follow.
    NotFound { message: String },
    /// Card matched a customer already on file.
    CardMatch { message: String, customer: Customer },
    /// Card extracted cleanly but matched nobody; onboarding may follow.
    CardExtracted {
        message: String,
        extracted: ExtractedCard,
    },
    /// Card extraction failed, possibly with partial OCR text.
    ExtractionFailed {
        message: String,
        raw_text: Option<String>,
    },
    /// Service-reported failure.
    ServiceError { message: String },
}

impl AssistantReply {
    /// Classify a chat response into its tagged form.
    pub fn from_chat(response: ChatResponse) -> Self {
        let ChatResponse {
            status,
            message,
            customer_data,
            customers,
            extracted_data,
        } = response;
        match status {
            AssistantStatus::FoundSingle
            | AssistantStatus::ExistingCustomerChat
            | AssistantStatus::DisambiguationResolved => match customer_data {
                Some(customer) => AssistantReply::SingleMatch {
                    status,
                    message,
                    customer,
                },
                None => AssistantReply::Plain { status, message },
            },
            AssistantStatus::FoundMultiple => match customers {
                Some(candidates) if !candidates.is_empty() => AssistantReply::MultipleMatches {
                    message,
                    candidates,
                },
                _ => AssistantReply::Plain { status, message },
            },
            AssistantStatus::NotFound => AssistantReply::NotFound { message },
            AssistantStatus::NewCustomerCard => match extracted_data {
                Some(extracted) => AssistantReply::CardExtracted { message, extracted },
                None => AssistantReply::Plain { status, message },
            },
            AssistantStatus::Error | AssistantStatus::ErrorResponse => {
                AssistantReply::ServiceError { message }
            }
            _ => AssistantReply::Plain { status, message },
        }
    }

    /// Classify a card-upload response into its tagged form.
    pub fn from_card(response: CardUploadResponse) -> Self {
        let CardUploadResponse {
            status,
            message,
            matched_customer,
            extracted_data,
            raw_text,
        } = response;
        match status {
            AssistantStatus::ExistingCustomerCard => match matched_customer {
                Some(customer) => AssistantReply::CardMatch { message, customer },
                None => AssistantReply::Plain { status, message },
            },
            AssistantStatus::NewCustomerCard => match extracted_data {
                Some(extracted) => AssistantReply::CardExtracted { message, extracted },
                None => AssistantReply::Plain { status, message },
            },
            AssistantStatus::ExtractionFailedCard => {
                AssistantReply::ExtractionFailed { message, raw_text }
            }
            AssistantStatus::Error | AssistantStatus::ErrorResponse => {
                AssistantReply::ServiceError { message }
            }
            _ => AssistantReply::Plain { status, message },
        }
    }

    /// Status tag for the reply, used for transcript tagging.
    pub fn status(&self) -> AssistantStatus {
        match self {
            AssistantReply::Plain { status, .. } => *status,
            AssistantReply::SingleMatch { status, .. } => *status,
            AssistantReply::MultipleMatches { .. } => AssistantStatus::FoundMultiple,
            AssistantReply::NotFound { .. } => AssistantStatus::NotFound,
            AssistantReply::CardMatch { .. } => AssistantStatus::ExistingCustomerCard,
            AssistantReply::CardExtracted { .. } => AssistantStatus::NewCustomerCard,
            AssistantReply::ExtractionFailed { .. } => AssistantStatus::ExtractionFailedCard,
            AssistantReply::ServiceError { .. } => AssistantStatus::Error,
        }
    }

    /// Human-readable message carried by the reply.
    pub fn message(&self) -> &str {
        match self {
            AssistantReply::Plain { message, .. }
            | AssistantReply::SingleMatch { message, .. }
            | AssistantReply::MultipleMatches { message, .. }
            | AssistantReply::NotFound { message }
            | AssistantReply::CardMatch { message, .. }
            | AssistantReply::CardExtracted { message, .. }
            | AssistantReply::ExtractionFailed { message, .. }
            | AssistantReply::ServiceError { message } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AssistantReply, AssistantStatus, CardUploadResponse, ChatResponse};
    use pretty_assertions::assert_eq;

    #[test]
    fn status_parses_wire_tags() {
        let status: AssistantStatus = serde_json::from_str(r#""found_single""#).expect("parse");
        assert_eq!(status, AssistantStatus::FoundSingle);
        assert_eq!(status.as_str(), "found_single");
    }

    #[test]
    fn unrecognized_status_falls_back_to_unknown() {
        let status: AssistantStatus =
            serde_json::from_str(r#""totally_new_tag""#).expect("parse");
        assert_eq!(status, AssistantStatus::Unknown);
    }

    #[test]
    fn chat_single_match_classifies_with_payload() {
        let body = r#"{
            "status": "found_single",
            "message": "Found it",
            "customer_data": {"id": 1, "name": "Acme Corporation", "created_at": "2026-07-01T00:00:00Z"}
        }"#;
        let response: ChatResponse = serde_json::from_str(body).expect("decode");
        let reply = AssistantReply::from_chat(response);
        match reply {
            AssistantReply::SingleMatch {
                status, customer, ..
            } => {
                assert_eq!(status, AssistantStatus::FoundSingle);
                assert_eq!(customer.name, "Acme Corporation");
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn match_status_without_payload_degrades_to_plain() {
        let body = r#"{"status": "found_single", "message": "Found it"}"#;
        let response: ChatResponse = serde_json::from_str(body).expect("decode");
        let reply = AssistantReply::from_chat(response);
        assert_eq!(
            reply,
            AssistantReply::Plain {
                status: AssistantStatus::FoundSingle,
                message: "Found it".to_string(),
            }
        );
    }

    #[test]
    fn card_extraction_failure_keeps_partial_text() {
        let body = r#"{"status": "extraction_failed_card", "message": "Could not read the card", "raw_text": "ACME CO..."}"#;
        let response: CardUploadResponse = serde_json::from_str(body).expect("decode");
        let reply = AssistantReply::from_card(response);
        assert_eq!(
            reply,
            AssistantReply::ExtractionFailed {
                message: "Could not read the card".to_string(),
                raw_text: Some("ACME CO...".to_string()),
            }
        );
        assert!(reply.status().is_failure());
    }

    #[test]
    fn creation_eligibility_covers_both_onboarding_paths() {
        assert!(AssistantStatus::NotFound.is_creation_eligible());
        assert!(AssistantStatus::NewCustomerCard.is_creation_eligible());
        assert!(!AssistantStatus::FoundSingle.is_creation_eligible());
        assert!(!AssistantStatus::Error.is_creation_eligible());
    }
}
