//! Error types for the remote boundaries.

use thiserror::Error;

/// Errors returned by customer store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store rejected the record (constraint violation).
    #[error("store rejected the record: {0}")]
    Validation(String),
    /// Transport failure or store-side error; the operation is abandoned.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Unavailable("request timed out".to_string())
        } else {
            StoreError::Unavailable(err.to_string())
        }
    }
}

/// Errors returned by assistant service operations.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// Non-success HTTP response from the service.
    #[error("assistant service error: {0}")]
    Service(String),
    /// The service could not be reached or the request timed out.
    #[error("assistant unreachable: {0}")]
    Transport(String),
    /// The response body did not match the expected shape.
    #[error("malformed assistant response: {0}")]
    MalformedBody(String),
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AssistantError::Transport("request timed out".to_string())
        } else if err.is_decode() {
            AssistantError::MalformedBody(err.to_string())
        } else {
            AssistantError::Transport(err.to_string())
        }
    }
}

/// Errors from client-side image preprocessing, reported before any
/// network call is attempted.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The bytes are not a recognizable image.
    #[error("unrecognized image data: {0}")]
    Unrecognized(String),
    /// The image decoded partially or not at all.
    #[error("failed to decode image: {0}")]
    Decode(String),
    /// Re-encoding to JPEG failed.
    #[error("failed to re-encode image as JPEG: {0}")]
    Encode(String),
}
