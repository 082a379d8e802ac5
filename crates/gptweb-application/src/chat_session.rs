//! Chat session orchestrator.
//!
//! A [`ChatSession`] owns one conversation: its single-flight guard, question
//! counter and memory. It composes prompts from questions and attached code,
//! calls the [`CompletionClient`] without holding its state lock, and reports
//! every step to the rendering surface through the [`DisplayBridge`].
//!
//! Reset and stop cannot cancel a remote call. Each request carries a
//! [`FlightTicket`] whose generation is compared on completion; results of an
//! abandoned generation are dropped.

use std::sync::Arc;

use gptweb_core::config::{DEFAULT_MODEL, DEFAULT_TEMPERATURE, Settings, keys};
use gptweb_core::conversation::{ConversationMemory, DEFAULT_SYSTEM_PROMPT};
use gptweb_core::editor::{CodeContext, EditorSurface, TextRange};
use gptweb_core::protocol::{InboundCommand, OutboundMessage, QuestionEcho};
use gptweb_core::remote::{CompletionClient, CompletionRequest};
use gptweb_core::session::{FlightTicket, SessionState};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::bridge::DisplayBridge;
use crate::dispatcher::EventDispatcher;
use crate::error_classifier::classify_remote_error;

/// Language assumed for attached code when the editor reports none.
pub const DEFAULT_CODE_LANGUAGE: &str = "javascript";

/// Model parameters and system instruction for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSessionConfig {
    pub model: String,
    pub temperature: f32,
    pub system_prompt: String,
}

impl Default for ChatSessionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl From<&Settings> for ChatSessionConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            model: settings.model.clone(),
            temperature: settings.temperature,
            ..Self::default()
        }
    }
}

/// How a submitted question was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskOutcome {
    /// Blank question; nothing happened.
    Ignored,
    /// Another request was outstanding; nothing happened.
    Busy,
    /// The answer was recorded and shown.
    Answered,
    /// The request failed and the classified message was shown.
    Failed(String),
    /// The result arrived after a reset or stop and was dropped.
    Discarded,
}

pub struct ChatSession {
    id: String,
    config: ChatSessionConfig,
    state: RwLock<SessionState>,
    client: Arc<dyn CompletionClient>,
    editor: Arc<dyn EditorSurface>,
    bridge: Arc<DisplayBridge>,
    telemetry: Option<Arc<EventDispatcher>>,
}

impl ChatSession {
    pub fn new(
        config: ChatSessionConfig,
        client: Arc<dyn CompletionClient>,
        editor: Arc<dyn EditorSurface>,
        bridge: Arc<DisplayBridge>,
    ) -> Self {
        let id = Uuid::new_v4().to_string();
        tracing::debug!("[ChatSession] Created session {} (model {})", id, config.model);

        Self {
            id,
            state: RwLock::new(SessionState::new(config.system_prompt.clone())),
            config,
            client,
            editor,
            bridge,
            telemetry: None,
        }
    }

    /// Logs requests and responses through `dispatcher`.
    pub fn with_telemetry(mut self, dispatcher: Arc<EventDispatcher>) -> Self {
        self.telemetry = Some(dispatcher);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn bridge(&self) -> &Arc<DisplayBridge> {
        &self.bridge
    }

    pub async fn in_progress(&self) -> bool {
        self.state.read().await.in_progress()
    }

    pub async fn question_counter(&self) -> u32 {
        self.state.read().await.question_counter()
    }

    /// Snapshot of the current conversation memory.
    pub async fn memory(&self) -> ConversationMemory {
        self.state.read().await.memory().clone()
    }

    /// Asks `question` about the editor's current selection, if any.
    pub async fn ask(&self, question: &str) -> AskOutcome {
        let code = self.editor.selected_code().await;
        self.submit_question(question, code).await
    }

    /// Runs one question through the session.
    ///
    /// Blank questions and questions submitted while another request is
    /// outstanding are dropped without any protocol output.
    pub async fn submit_question(&self, question: &str, code: Option<CodeContext>) -> AskOutcome {
        let question = question.trim();
        if question.is_empty() {
            tracing::debug!("[ChatSession] Ignoring empty question");
            return AskOutcome::Ignored;
        }

        // 1. Claim the flight slot
        let Some(ticket) = self.state.write().await.begin_question() else {
            tracing::debug!("[ChatSession] Request already in progress, dropping question");
            return AskOutcome::Busy;
        };

        let prompt = compose_prompt(question, code.as_ref());

        // 2. Announce the question before the first suspension point
        self.bridge.post(OutboundMessage::ShowInProgress { in_progress: true });
        self.bridge.post(OutboundMessage::AddQuestion {
            value: QuestionEcho {
                question: question.to_string(),
                code_block: code.as_ref().map(|c| c.code.clone()).unwrap_or_default(),
            },
            id: ticket.message_id().to_string(),
        });
        if let Some(telemetry) = &self.telemetry {
            telemetry.record_chat_request(&prompt, code.is_some());
        }
        self.editor.reveal_chat_view().await;

        // 3. Call the remote model without holding the state lock
        let transcript = {
            let state = self.state.read().await;
            if !state.is_current(&ticket) {
                drop(state);
                tracing::info!(
                    "[ChatSession] {} request {} abandoned before sending",
                    self.id,
                    ticket.message_id()
                );
                self.finish(&ticket).await;
                return AskOutcome::Discarded;
            }
            state.memory().transcript_with(&prompt)
        };
        tracing::info!(
            "[ChatSession] {} sending question with {} prior messages",
            self.id,
            transcript.len() - 1
        );
        let result = self
            .client
            .complete(CompletionRequest {
                model: self.config.model.clone(),
                temperature: self.config.temperature,
                messages: transcript,
            })
            .await;

        // 4. Apply the result if the conversation is still the same one
        let outcome = {
            let mut state = self.state.write().await;
            if !state.is_current(&ticket) {
                tracing::info!(
                    "[ChatSession] {} discarding result of abandoned request {}",
                    self.id,
                    ticket.message_id()
                );
                AskOutcome::Discarded
            } else {
                match result {
                    Ok(answer) => {
                        state.record_exchange(&ticket, &prompt, &answer);
                        self.bridge.post(OutboundMessage::AddResponse {
                            value: answer.clone(),
                            id: ticket.message_id().to_string(),
                        });
                        if let Some(telemetry) = &self.telemetry {
                            telemetry.record_chat_response(&answer);
                        }
                        AskOutcome::Answered
                    }
                    Err(error) => {
                        let message = classify_remote_error(&error);
                        tracing::warn!(
                            http_status = ?error.http_status,
                            "[ChatSession] {} request failed: {}",
                            self.id,
                            error
                        );
                        self.bridge.post(OutboundMessage::AddError {
                            value: message.clone(),
                        });
                        AskOutcome::Failed(message)
                    }
                }
            }
        };

        // 5. Return to idle
        self.finish(&ticket).await;
        outcome
    }

    async fn finish(&self, ticket: &FlightTicket) {
        let released = self.state.write().await.finish(ticket);
        if released {
            self.editor.collapse_selection().await;
            self.bridge
                .post(OutboundMessage::ShowInProgress { in_progress: false });
        }
    }

    /// Starts a fresh conversation. An outstanding request keeps running but
    /// its result will be dropped.
    pub async fn reset_conversation(&self) {
        self.state.write().await.reset();
        tracing::info!("[ChatSession] {} conversation reset", self.id);
    }

    /// Returns to idle immediately without waiting for an outstanding request.
    pub async fn stop_generating(&self) {
        self.state.write().await.stop();
        self.bridge
            .post(OutboundMessage::ShowInProgress { in_progress: false });
        tracing::info!("[ChatSession] {} generation stopped", self.id);
    }

    /// Forwards the editor's primary selection to the rendering surface.
    pub fn set_context_selection(&self, range: TextRange) {
        self.bridge.post(OutboundMessage::SetSelection { value: range });
    }

    /// Executes a command from the rendering surface.
    ///
    /// Returns the outcome when the command was a question.
    pub async fn handle_command(&self, command: InboundCommand) -> Option<AskOutcome> {
        match command {
            InboundCommand::AskQuestion { value } => return Some(self.ask(&value).await),
            InboundCommand::OpenSettings => self.editor.open_settings(keys::API_KEY).await,
            InboundCommand::OpenSearchSettings => {
                self.editor.open_settings(keys::SEARCH_ENGINE).await
            }
            InboundCommand::ClearConversation => self.reset_conversation().await,
            InboundCommand::StopGenerating => self.stop_generating().await,
        }
        None
    }
}

/// Builds the text sent to the model for `question`.
pub fn compose_prompt(question: &str, code: Option<&CodeContext>) -> String {
    match code {
        Some(context) => {
            let language = context
                .language_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .unwrap_or(DEFAULT_CODE_LANGUAGE);
            format!(
                "{question} (The question refers to the code in {language}: \n{})",
                context.code
            )
        }
        None => question.to_string(),
    }
}
