//! Chat-driven customer resolution session.
//!
//! The session owns the ordered transcript, the staged-upload buffer, and
//! the onboarding form overlay, and interprets each assistant reply to
//! decide the next affordance. At most one submission is in flight at a
//! time; the input surface is disabled for the duration.

use crate::cache::CacheControl;
use crate::onboarding::OnboardingForm;
use crate::types::{ChatMessage, Sender};
use chrono::Local;
use jia_client::{AssistantService, CardImage, CustomerStore, prepare_card_image};
use jia_protocol::{AssistantReply, AssistantStatus, Customer, ExtractedCard};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Opening assistant message shown in every new session.
pub const GREETING: &str = "I'm here to help! Try something like 'Find customer Acme Corporation' \
                            or ask me about GST or customer onboarding.";

/// Follow-up appended after a not-found reply.
const ONBOARDING_CHECKLIST: &str = "This customer does not exist. To create a new customer, \
                                    please have the following ready:\n\n\u{2022} GST Number\n\u{2022} PAN Number\n\u{2022} Soft copies of ID Proofs";

/// Follow-up appended after an unmatched card extraction.
const CARD_CREATE_PROMPT: &str =
    "Would you like to create a new customer with these details? Choose create to continue.";

/// Nominal pacing delay before a follow-up message is rendered.
///
/// The transcript appends both messages in order during the transition;
/// interactive surfaces may use this delay when revealing the second one.
pub const FOLLOWUP_DELAY: Duration = Duration::from_millis(500);

/// Delay before the onboarding form auto-closes after a success banner.
pub const FORM_CLOSE_DELAY: Duration = Duration::from_millis(1500);

/// Affordance the session is currently presenting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing pending; input enabled.
    Idle,
    /// A request is outstanding; input disabled.
    AwaitingResponse,
    /// The latest assistant message offers customer creation.
    ShowingCreatePrompt,
    /// The onboarding form overlay is active; input disabled.
    ShowingOnboardingForm,
    /// The latest assistant message lists candidate matches.
    ShowingDisambiguation,
}

/// One chat session against the assistant service.
pub struct ChatSession {
    id: Uuid,
    assistant: Arc<dyn AssistantService>,
    messages: Vec<ChatMessage>,
    next_message_id: u64,
    staged: Option<CardImage>,
    awaiting: bool,
    form: Option<OnboardingForm>,
    /// Id of the most recent message carrying extracted card data,
    /// maintained on append so prefill never rescans the transcript.
    last_extracted: Option<u64>,
    closed: bool,
}

impl ChatSession {
    /// Open a new session and append the greeting.
    pub fn new(assistant: Arc<dyn AssistantService>) -> Self {
        let mut session = Self {
            id: Uuid::new_v4(),
            assistant,
            messages: Vec::new(),
            next_message_id: 0,
            staged: None,
            awaiting: false,
            form: None,
            last_extracted: None,
            closed: false,
        };
        info!("chat session opened (session_id={})", session.id);
        session.push_assistant(GREETING.to_string(), Some(AssistantStatus::Greeting));
        session
    }

    /// Session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Ordered transcript, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// File currently staged for the next submission, if any.
    pub fn staged_upload(&self) -> Option<&CardImage> {
        self.staged.as_ref()
    }

    /// Whether the input surface should be disabled.
    pub fn input_disabled(&self) -> bool {
        self.awaiting || self.form.is_some()
    }

    /// Whether the create-customer affordance is visible.
    ///
    /// Derived each render: the latest message must be an assistant message
    /// with a creation-eligible status, with no request in flight and no
    /// form open. Historical messages never resurrect the prompt.
    pub fn create_prompt_visible(&self) -> bool {
        if self.awaiting || self.form.is_some() || self.closed {
            return false;
        }
        match self.messages.last() {
            Some(message) if message.sender == Sender::Assistant => message
                .status
                .is_some_and(|status| status.is_creation_eligible()),
            _ => false,
        }
    }

    /// Current affordance, derived from the transcript and flags.
    pub fn state(&self) -> SessionState {
        if self.awaiting {
            return SessionState::AwaitingResponse;
        }
        if self.form.is_some() {
            return SessionState::ShowingOnboardingForm;
        }
        if self.create_prompt_visible() {
            return SessionState::ShowingCreatePrompt;
        }
        match self.messages.last() {
            Some(message) if !message.candidates.is_empty() => SessionState::ShowingDisambiguation,
            _ => SessionState::Idle,
        }
    }

    /// Stage a file for the next submission, replacing any previous one.
    pub fn stage_upload(&mut self, image: CardImage) {
        if self.input_disabled() || self.closed {
            warn!("ignoring staged upload while input is disabled (session_id={})", self.id);
            return;
        }
        debug!(
            "staging upload (session_id={}, file={}, bytes={})",
            self.id,
            image.file_name,
            image.bytes.len()
        );
        self.staged = Some(image);
    }

    /// Discard the staged file without submitting it.
    pub fn clear_staged(&mut self) {
        self.staged = None;
    }

    /// Submit the staged file if present, else the typed text.
    ///
    /// The user's contribution is echoed into the transcript before the
    /// remote call resolves. A staged file takes priority and the typed
    /// text is ignored for transport purposes.
    pub async fn submit(&mut self, input: &str) {
        if self.closed || self.input_disabled() {
            return;
        }
        if let Some(staged) = self.staged.take() {
            self.submit_card(staged).await;
            return;
        }
        let text = input.trim();
        if text.is_empty() {
            return;
        }

        self.push_user(text.to_string(), None);
        self.awaiting = true;
        let result = self.assistant.send_chat(text).await;
        self.awaiting = false;
        if self.closed {
            debug!("dropping late chat response (session_id={})", self.id);
            return;
        }
        match result {
            Ok(response) => self.apply_reply(AssistantReply::from_chat(response)),
            Err(err) => {
                warn!("chat request failed (session_id={}, err={})", self.id, err);
                self.push_error_response(format!(
                    "Sorry, I'm having trouble reaching the assistant: {err}"
                ));
            }
        }
    }

    /// Convert and upload a staged card image.
    async fn submit_card(&mut self, staged: CardImage) {
        let label = staged.file_name.clone();
        self.push_user(format!("Uploaded card: {label}"), Some(label));

        // Re-encode before any network traffic; a conversion failure
        // short-circuits the submission entirely.
        let prepared = match prepare_card_image(staged) {
            Ok(prepared) => prepared,
            Err(err) => {
                warn!(
                    "card conversion failed (session_id={}, err={})",
                    self.id, err
                );
                self.push_error_response(format!("Could not process the card image: {err}"));
                return;
            }
        };

        self.awaiting = true;
        let result = self.assistant.upload_card(prepared).await;
        self.awaiting = false;
        if self.closed {
            debug!("dropping late card response (session_id={})", self.id);
            return;
        }
        match result {
            Ok(response) => self.apply_reply(AssistantReply::from_card(response)),
            Err(err) => {
                warn!("card upload failed (session_id={}, err={})", self.id, err);
                self.push_error_response(format!(
                    "Sorry, I couldn't process the card upload: {err}"
                ));
            }
        }
    }

    /// Append the transcript entries for one classified reply.
    fn apply_reply(&mut self, reply: AssistantReply) {
        debug!(
            "applying assistant reply (session_id={}, status={})",
            self.id,
            reply.status().as_str()
        );
        match reply {
            AssistantReply::SingleMatch {
                status,
                message,
                customer,
            } => {
                let text = format_customer_details(&message, &customer);
                self.push_assistant_with(text, Some(status), Some(customer), Vec::new(), None);
            }
            AssistantReply::MultipleMatches {
                message,
                candidates,
            } => {
                let text = format_candidate_list(&message, &candidates);
                self.push_assistant_with(
                    text,
                    Some(AssistantStatus::FoundMultiple),
                    None,
                    candidates,
                    None,
                );
            }
            AssistantReply::NotFound { message } => {
                self.push_assistant(message, Some(AssistantStatus::NotFound));
                self.push_assistant(
                    ONBOARDING_CHECKLIST.to_string(),
                    Some(AssistantStatus::NotFound),
                );
            }
            AssistantReply::CardMatch { message, customer } => {
                let text = format_customer_details(&message, &customer);
                self.push_assistant_with(
                    text,
                    Some(AssistantStatus::ExistingCustomerCard),
                    Some(customer),
                    Vec::new(),
                    None,
                );
            }
            AssistantReply::CardExtracted { message, extracted } => {
                let text = format_extracted_summary(&message, &extracted);
                self.push_assistant_with(
                    text,
                    Some(AssistantStatus::NewCustomerCard),
                    None,
                    Vec::new(),
                    Some(extracted),
                );
                self.push_assistant(
                    CARD_CREATE_PROMPT.to_string(),
                    Some(AssistantStatus::NewCustomerCard),
                );
            }
            AssistantReply::ExtractionFailed { message, raw_text } => {
                let text = match raw_text {
                    Some(raw) if !raw.trim().is_empty() => {
                        format!("{message}\n\nPartial text:\n{raw}")
                    }
                    _ => message,
                };
                self.push_assistant(text, Some(AssistantStatus::ExtractionFailedCard));
            }
            AssistantReply::ServiceError { message } => {
                self.push_assistant(message, Some(AssistantStatus::Error));
            }
            AssistantReply::Plain { status, message } => {
                self.push_assistant(message, Some(status));
            }
        }
    }

    /// Open the onboarding form, prefilled from the most recent extracted
    /// card data when available.
    ///
    /// Returns false when the session cannot show a form right now.
    pub fn open_onboarding(&mut self) -> bool {
        if self.closed || self.input_disabled() {
            return false;
        }
        let prefill = self
            .last_extracted
            .and_then(|id| self.messages.iter().find(|message| message.id == id))
            .and_then(|message| message.extracted.clone());
        info!(
            "opening onboarding form (session_id={}, prefilled={})",
            self.id,
            prefill.is_some()
        );
        self.form = Some(match prefill {
            Some(card) => OnboardingForm::with_prefill(&card),
            None => OnboardingForm::new(),
        });
        true
    }

    /// Active onboarding form, if open.
    pub fn form(&self) -> Option<&OnboardingForm> {
        self.form.as_ref()
    }

    /// Mutable access to the active onboarding form.
    pub fn form_mut(&mut self) -> Option<&mut OnboardingForm> {
        self.form.as_mut()
    }

    /// Close the form and discard the draft; no side effects, idempotent.
    pub fn cancel_onboarding(&mut self) {
        if self.form.take().is_some() {
            debug!("onboarding form cancelled (session_id={})", self.id);
        }
    }

    /// Submit the open onboarding form.
    ///
    /// On success the form closes, the transcript records a confirmation,
    /// and the caller's caches have been invalidated. On failure the form
    /// stays open and editable with its banner set.
    pub async fn submit_onboarding(
        &mut self,
        store: &dyn CustomerStore,
        caches: &CacheControl,
    ) -> Option<Customer> {
        let created = match self.form.as_mut() {
            Some(form) => form.submit(store, caches).await,
            None => return None,
        }?;
        self.form = None;
        self.push_assistant(
            format!(
                "Customer '{}' created successfully (ID {}).",
                created.name, created.id
            ),
            None,
        );
        Some(created)
    }

    /// Read-only view of one candidate from a disambiguation message.
    pub fn view_candidate(&self, message_id: u64, index: usize) -> Option<&Customer> {
        self.messages
            .iter()
            .find(|message| message.id == message_id)
            .and_then(|message| message.candidates.get(index))
    }

    /// Discard the session; any late-arriving response is ignored.
    pub fn close(&mut self) {
        info!("chat session closed (session_id={})", self.id);
        self.closed = true;
        self.staged = None;
    }

    fn push_user(&mut self, text: String, image_label: Option<String>) {
        let message = ChatMessage {
            id: self.next_id(),
            sender: Sender::User,
            text,
            sent_at: display_timestamp(),
            status: None,
            customer: None,
            candidates: Vec::new(),
            extracted: None,
            image_label,
        };
        self.push(message);
    }

    fn push_assistant(&mut self, text: String, status: Option<AssistantStatus>) {
        self.push_assistant_with(text, status, None, Vec::new(), None);
    }

    fn push_assistant_with(
        &mut self,
        text: String,
        status: Option<AssistantStatus>,
        customer: Option<Customer>,
        candidates: Vec<Customer>,
        extracted: Option<ExtractedCard>,
    ) {
        let message = ChatMessage {
            id: self.next_id(),
            sender: Sender::Assistant,
            text,
            sent_at: display_timestamp(),
            status,
            customer,
            candidates,
            extracted,
            image_label: None,
        };
        if message.extracted.is_some() {
            self.last_extracted = Some(message.id);
        }
        self.push(message);
    }

    fn push_error_response(&mut self, text: String) {
        self.push_assistant(text, Some(AssistantStatus::ErrorResponse));
    }

    fn push(&mut self, message: ChatMessage) {
        debug!(
            "appending message (session_id={}, id={}, sender={}, status={:?})",
            self.id,
            message.id,
            message.sender.as_str(),
            message.status.map(|status| status.as_str())
        );
        self.messages.push(message);
    }

    fn next_id(&mut self) -> u64 {
        self.next_message_id += 1;
        self.next_message_id
    }
}

/// Display timestamp formatted at creation time, e.g. `04:47 PM`.
fn display_timestamp() -> String {
    Local::now().format("%I:%M %p").to_string()
}

/// Render a matched customer as a detail block under the reply message.
fn format_customer_details(message: &str, customer: &Customer) -> String {
    let mut out = String::from(message.trim());
    out.push('\n');
    out.push_str(&format!("\nName: {}", customer.name));
    let optionals = [
        ("Company", &customer.company),
        ("GST", &customer.gst_number),
        ("PAN", &customer.pan_number),
        ("Email", &customer.email_address),
        ("Phone", &customer.phone_number),
        ("Address", &customer.address),
    ];
    for (label, value) in optionals {
        if let Some(value) = value {
            out.push_str(&format!("\n{label}: {value}"));
        }
    }
    out
}

/// Render candidates as an enumerated, independently-viewable list.
fn format_candidate_list(message: &str, candidates: &[Customer]) -> String {
    let mut out = String::from(message.trim());
    out.push('\n');
    for (index, candidate) in candidates.iter().enumerate() {
        out.push_str(&format!("\n{}. {}", index + 1, candidate.name));
        if let Some(gst) = &candidate.gst_number {
            out.push_str(&format!(" (GST: {gst})"));
        }
    }
    out
}

/// Render extracted card fields as a summary block.
fn format_extracted_summary(message: &str, card: &ExtractedCard) -> String {
    let mut out = String::from(message.trim());
    out.push('\n');
    let fields = [
        ("Name", &card.name),
        ("Company", &card.company),
        ("GST", &card.gst_number),
        ("PAN", &card.pan_number),
        ("Email", &card.email_address),
        ("Phone", &card.phone_number),
        ("Address", &card.address),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            out.push_str(&format!("\n{label}: {value}"));
        }
    }
    out
}
