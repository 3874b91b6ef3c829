//! Scripted assistant service double.

use async_trait::async_trait;
use jia_client::{AssistantError, AssistantService, CardImage};
use jia_protocol::{CardUploadResponse, ChatResponse, Customer};
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;

type Scripted<T> = Result<T, String>;

/// Assistant double that replays scripted responses in order and records
/// every request it receives.
///
/// `search_customers` mirrors the real backend: a case-insensitive
/// substring match on name over the seeded directory, ordered by name.
#[derive(Default)]
pub struct ScriptedAssistant {
    chat_replies: Mutex<VecDeque<Scripted<ChatResponse>>>,
    card_replies: Mutex<VecDeque<Scripted<CardUploadResponse>>>,
    chat_messages: Mutex<Vec<String>>,
    uploads: Mutex<Vec<CardImage>>,
    directory: RwLock<Vec<Customer>>,
}

impl ScriptedAssistant {
    /// Double with no scripted replies and an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the directory used by `search_customers`.
    pub fn with_directory(customers: Vec<Customer>) -> Self {
        Self {
            directory: RwLock::new(customers),
            ..Self::default()
        }
    }

    /// Queue a chat reply.
    pub fn push_chat(&self, response: ChatResponse) {
        self.chat_replies.lock().push_back(Ok(response));
    }

    /// Queue a chat transport failure.
    pub fn push_chat_failure(&self, message: &str) {
        self.chat_replies.lock().push_back(Err(message.to_string()));
    }

    /// Queue a card-upload reply.
    pub fn push_card(&self, response: CardUploadResponse) {
        self.card_replies.lock().push_back(Ok(response));
    }

    /// Queue a card-upload transport failure.
    pub fn push_card_failure(&self, message: &str) {
        self.card_replies.lock().push_back(Err(message.to_string()));
    }

    /// Chat messages received so far.
    pub fn chat_messages(&self) -> Vec<String> {
        self.chat_messages.lock().clone()
    }

    /// Card images received so far.
    pub fn uploads(&self) -> Vec<CardImage> {
        self.uploads.lock().clone()
    }

    /// Number of upload requests that reached the service.
    pub fn upload_calls(&self) -> usize {
        self.uploads.lock().len()
    }
}

#[async_trait]
impl AssistantService for ScriptedAssistant {
    async fn send_chat(&self, message: &str) -> Result<ChatResponse, AssistantError> {
        self.chat_messages.lock().push(message.to_string());
        match self.chat_replies.lock().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(err)) => Err(AssistantError::Transport(err)),
            None => Err(AssistantError::Transport(
                "no scripted chat reply".to_string(),
            )),
        }
    }

    async fn upload_card(&self, image: CardImage) -> Result<CardUploadResponse, AssistantError> {
        self.uploads.lock().push(image);
        match self.card_replies.lock().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(err)) => Err(AssistantError::Transport(err)),
            None => Err(AssistantError::Transport(
                "no scripted card reply".to_string(),
            )),
        }
    }

    async fn search_customers(&self, query: &str) -> Result<Vec<Customer>, AssistantError> {
        let needle = query.to_lowercase();
        let mut matches: Vec<Customer> = self
            .directory
            .read()
            .iter()
            .filter(|customer| customer.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matches)
    }
}
