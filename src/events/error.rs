//! Classification of failed orchestrator calls.

use crate::api::{ApiError, Envelope};

/// Shown when a failure carries no usable text of its own.
pub const GENERIC_ERROR_MESSAGE: &str = "Some error occurred";

/// Why a gateway call did not produce the expected outcome.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The server answered but rejected the request
    #[error("Server rejected the request: {messages:?}")]
    Application { messages: Vec<String> },

    /// No usable response was obtained
    #[error("Network error: {0}")]
    Network(#[from] ApiError),
}

impl SyncError {
    /// Text stored in the global error field for the view layer.
    ///
    pub fn user_message(&self) -> String {
        let message = match self {
            SyncError::Application { messages } => messages.first().cloned().unwrap_or_default(),
            SyncError::Network(error) => error.to_string(),
        };
        if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

/// Unwrap the payload of a successful envelope or classify the rejection.
///
pub fn accept<T>(envelope: Envelope<T>) -> Result<T, SyncError> {
    if envelope.is_success() {
        Ok(envelope.data)
    } else {
        Err(SyncError::Application {
            messages: envelope.messages,
        })
    }
}
