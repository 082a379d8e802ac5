//! OpenAIApiAgent - Direct REST API implementation for OpenAI chat completions.
//!
//! Implements [`CompletionClient`] and [`CredentialValidator`]. Every failure is
//! normalized into a [`RemoteError`] here so the chat session never has to
//! probe HTTP or JSON error shapes itself.

use async_trait::async_trait;
use gptweb_core::config::Settings;
use gptweb_core::conversation::{ConversationMessage, MessageRole};
use gptweb_core::error::{GptWebError, Result};
use gptweb_core::remote::{CompletionClient, CompletionRequest, CredentialValidator, RemoteError};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const BASE_URL: &str = "https://api.openai.com/v1";

/// Status codes the chat session has dedicated user-facing messages for.
const CLASSIFIED_STATUSES: [u16; 6] = [400, 401, 403, 404, 429, 500];

/// Agent implementation that talks to the OpenAI HTTP API.
#[derive(Clone)]
pub struct OpenAIApiAgent {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIApiAgent {
    /// Creates a new agent with the provided API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Creates an agent from the configured API key.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.api_key.clone())
    }

    /// Points the agent at an OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> std::result::Result<String, RemoteError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| RemoteError::with_message(format!("OpenAI API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            RemoteError::with_message(format!("Failed to parse OpenAI response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl CompletionClient for OpenAIApiAgent {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<String, RemoteError> {
        let body = ChatCompletionRequest {
            model: request.model,
            temperature: request.temperature,
            messages: request.messages.iter().map(ChatMessage::from).collect(),
        };

        tracing::debug!(
            "[OpenAIApiAgent] Sending {} messages to model {}",
            body.messages.len(),
            body.model
        );

        self.send_request(&body).await
    }
}

#[async_trait]
impl CredentialValidator for OpenAIApiAgent {
    async fn validate(&self, api_key: &str) -> Result<()> {
        if api_key.trim().is_empty() {
            return Err(GptWebError::invalid_credential("The API Key can not be empty"));
        }

        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(api_key)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => Ok(()),
            Ok(response) => {
                tracing::warn!(
                    "[OpenAIApiAgent] Key validation rejected with HTTP {}",
                    response.status()
                );
                Err(GptWebError::invalid_credential("Your API key is invalid"))
            }
            Err(err) => {
                tracing::warn!("[OpenAIApiAgent] Key validation request failed: {}", err);
                Err(GptWebError::invalid_credential("Your API key is invalid"))
            }
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

impl From<&ConversationMessage> for ChatMessage {
    fn from(message: &ConversationMessage) -> Self {
        let role = match message.role {
            MessageRole::System => "system",
            MessageRole::Human => "user",
            MessageRole::Assistant => "assistant",
        };
        Self {
            role,
            content: message.content.clone(),
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> std::result::Result<String, RemoteError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| RemoteError::with_message("OpenAI API returned no content in the response"))
}

/// Normalizes a non-success HTTP response.
///
/// Statuses with a dedicated user-facing message carry only the code; any
/// other status also carries its reason phrase so it can be shown verbatim.
fn map_http_error(status: StatusCode, body: &str) -> RemoteError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .ok()
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });

    let mut error = RemoteError::with_status(status.as_u16());
    if !CLASSIFIED_STATUSES.contains(&status.as_u16()) {
        error = error.status_text(status.canonical_reason().unwrap_or_default());
    }
    if let Some(message) = message {
        error = error.message(message);
    }
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_http_error_extracts_api_message() {
        let body = r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota"}}"#;
        let error = map_http_error(StatusCode::TOO_MANY_REQUESTS, body);

        assert_eq!(error.http_status, Some(429));
        assert_eq!(error.http_status_text, None);
        assert_eq!(error.message.as_deref(), Some("You exceeded your current quota"));
    }

    #[test]
    fn test_map_http_error_keeps_reason_for_unclassified_status() {
        let error = map_http_error(StatusCode::BAD_GATEWAY, "");

        assert_eq!(error.http_status, Some(502));
        assert_eq!(error.http_status_text.as_deref(), Some("Bad Gateway"));
        assert_eq!(error.message, None);
    }

    #[test]
    fn test_map_http_error_falls_back_to_raw_body() {
        let error = map_http_error(StatusCode::UNAUTHORIZED, "unauthorized\n");
        assert_eq!(error.message.as_deref(), Some("unauthorized"));
    }

    #[test]
    fn test_roles_map_to_openai_names() {
        let roles: Vec<&str> = [
            ConversationMessage::system("s"),
            ConversationMessage::human("h"),
            ConversationMessage::assistant("a"),
        ]
        .iter()
        .map(|m| ChatMessage::from(m).role)
        .collect();
        assert_eq!(roles, vec!["system", "user", "assistant"]);
    }

    #[test]
    fn test_extract_text_requires_content() {
        let empty = ChatCompletionResponse { choices: vec![] };
        assert!(extract_text_response(empty).is_err());

        let parsed: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"This prints 1."}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text_response(parsed).unwrap(), "This prints 1.");
    }

    #[tokio::test]
    async fn test_validate_rejects_blank_key_without_network() {
        let agent = OpenAIApiAgent::new("unused");
        let err = agent.validate("   ").await.unwrap_err();
        assert!(err.is_invalid_credential());
        assert_eq!(err.to_string(), "Invalid credential: The API Key can not be empty");
    }
}
