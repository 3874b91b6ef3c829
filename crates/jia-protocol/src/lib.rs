//! Wire types shared between the jia clients and the console core.

mod assistant;
mod customer;

pub use assistant::{
    AssistantReply, AssistantStatus, CardUploadResponse, ChatRequest, ChatResponse, ExtractedCard,
};
pub use customer::{Customer, CustomerDraft};
