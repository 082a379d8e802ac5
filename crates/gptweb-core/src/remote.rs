//! Remote completion collaborator boundary.
//!
//! The application layer only ever sees [`CompletionClient`] and the single
//! normalized failure shape [`RemoteError`]; concrete HTTP clients live in
//! `gptweb-interaction` and are responsible for normalizing into it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::conversation::ConversationMessage;
use crate::error::Result;

/// A completion call: the full transcript plus model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub temperature: f32,
    /// System instruction, prior turns, then the new human turn.
    pub messages: Vec<ConversationMessage>,
}

/// Failure reported by the remote completion service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteError {
    /// HTTP status code of the failed response, if one was received.
    pub http_status: Option<u16>,
    /// Status line text, set when the transport reports one worth showing verbatim.
    pub http_status_text: Option<String>,
    /// Message carried by the service (e.g. `error.message` of an OpenAI error body).
    pub message: Option<String>,
}

impl RemoteError {
    pub fn with_status(status: u16) -> Self {
        Self {
            http_status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn status_text(mut self, text: impl Into<String>) -> Self {
        self.http_status_text = Some(text.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Generic description used when nothing more specific is known.
    pub fn describe(&self) -> String {
        match (self.http_status, &self.message) {
            (Some(status), Some(message)) => {
                format!("completion request failed with HTTP {status}: {message}")
            }
            (Some(status), None) => format!("completion request failed with HTTP {status}"),
            (None, Some(message)) => format!("completion request failed: {message}"),
            (None, None) => "completion request failed".to_string(),
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl std::error::Error for RemoteError {}

/// The remote language model.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends the transcript and returns the assistant's reply text.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<String, RemoteError>;
}

/// Checks whether an API key is accepted by the remote service.
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    /// Returns `InvalidCredential` when the key is rejected.
    async fn validate(&self, api_key: &str) -> Result<()>;
}
