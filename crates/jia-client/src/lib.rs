//! HTTP boundaries of the console: the hosted customer store and the
//! remote extraction/matching assistant.

mod assistant;
mod error;
mod image;
mod store;

pub use assistant::{AssistantService, HttpAssistantClient};
pub use error::{AssistantError, ConversionError, StoreError};
pub use image::{CardImage, prepare_card_image};
pub use store::{CustomerStore, RestCustomerStore};
