//! Transcript types for the chat session.

use jia_protocol::{AssistantStatus, Customer, ExtractedCard};
use serde::Serialize;

/// Speaker side of a transcript message.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// User-authored message.
    User,
    /// Assistant-authored message.
    Assistant,
}

impl Sender {
    /// Return the sender as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

/// One line of the conversation transcript.
///
/// Messages are append-only within a session and never mutated after
/// creation; ordering is strictly insertion order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatMessage {
    /// Locally assigned, monotonically increasing identifier.
    pub id: u64,
    /// Who produced the message.
    pub sender: Sender,
    /// Display text.
    pub text: String,
    /// Display timestamp, formatted at creation time.
    pub sent_at: String,
    /// Status tag for assistant messages.
    pub status: Option<AssistantStatus>,
    /// Attached customer record, when the reply carried one.
    pub customer: Option<Customer>,
    /// Candidate customers for disambiguation replies.
    pub candidates: Vec<Customer>,
    /// Extracted card fields, when the reply carried them.
    pub extracted: Option<ExtractedCard>,
    /// Inline preview label for an uploaded image.
    pub image_label: Option<String>,
}
