//! Composition root.
//!
//! [`Extension`] wires the telemetry pipeline and the chat session together
//! for one editor process and routes host callbacks to them. The two halves
//! fail independently: a log directory that cannot be created only disables
//! telemetry.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local};
use gptweb_core::config::Settings;
use gptweb_core::editor::{EditorOccurrence, EditorSurface};
use gptweb_core::error::Result;
use gptweb_core::protocol::InboundCommand;
use gptweb_core::remote::CompletionClient;
use gptweb_infrastructure::{GptWebPaths, JsonlLogSink, SettingsStorage};

use crate::bridge::DisplayBridge;
use crate::chat_session::{AskOutcome, ChatSession, ChatSessionConfig};
use crate::dispatcher::{DispatchOutcome, EventDispatcher};
use crate::web_search::{WebSearch, WebSearchOutcome};

/// Question asked by the "explain" command.
pub const EXPLAIN_QUESTION: &str = "Explain the code";

pub struct Extension {
    settings: Settings,
    session: Arc<ChatSession>,
    telemetry: Option<Arc<EventDispatcher>>,
    web_search: WebSearch,
    log_path: Option<PathBuf>,
    storage: Option<Arc<SettingsStorage>>,
}

impl Extension {
    /// Assembles an extension from already-built parts.
    pub fn new(
        settings: Settings,
        client: Arc<dyn CompletionClient>,
        editor: Arc<dyn EditorSurface>,
        telemetry: Option<Arc<EventDispatcher>>,
    ) -> Self {
        let bridge = Arc::new(DisplayBridge::new());
        let mut session = ChatSession::new(
            ChatSessionConfig::from(&settings),
            client,
            editor.clone(),
            bridge,
        );
        if let Some(dispatcher) = &telemetry {
            session = session.with_telemetry(dispatcher.clone());
        }

        Self {
            settings,
            session: Arc::new(session),
            web_search: WebSearch::new(editor, telemetry.clone()),
            telemetry,
            log_path: None,
            storage: None,
        }
    }

    /// Starts the extension, opening the session log under the configured
    /// output directory.
    pub fn activate(
        settings: Settings,
        client: Arc<dyn CompletionClient>,
        editor: Arc<dyn EditorSurface>,
        created_at: DateTime<Local>,
    ) -> Self {
        let output_dir = GptWebPaths::expand_output_dir(&settings.output_directory);

        let (telemetry, log_path) = match JsonlLogSink::for_session(&output_dir, created_at) {
            Ok(sink) => {
                let path = sink.path().to_path_buf();
                (Some(Arc::new(EventDispatcher::new(Arc::new(sink)))), Some(path))
            }
            Err(e) => {
                tracing::warn!("[Extension] Telemetry disabled: {}", e);
                (None, None)
            }
        };

        let mut extension = Self::new(settings, client, editor, telemetry);
        extension.log_path = log_path;
        tracing::info!(
            "[Extension] Activated (session {}, telemetry {})",
            extension.session.id(),
            if extension.telemetry.is_some() { "on" } else { "off" }
        );
        extension
    }

    /// Re-reads settings from `storage` for operations that honor edits made
    /// while running. Model and API key stay bound to the session's client.
    pub fn with_settings_storage(mut self, storage: Arc<SettingsStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn session(&self) -> &Arc<ChatSession> {
        &self.session
    }

    pub fn bridge(&self) -> &Arc<DisplayBridge> {
        self.session.bridge()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Path of the session log, when telemetry is active.
    pub fn log_path(&self) -> Option<&PathBuf> {
        self.log_path.as_ref()
    }

    /// Handles one editor occurrence.
    ///
    /// Selection changes are forwarded to the chat surface whether or not they
    /// are logged. Returns `None` when telemetry is disabled.
    pub fn on_editor_occurrence(&self, occurrence: &EditorOccurrence) -> Option<DispatchOutcome> {
        if let EditorOccurrence::SelectionChanged { selections, .. } = occurrence {
            if let Some(primary) = selections.first() {
                self.session.set_context_selection(*primary);
            }
        }

        self.telemetry
            .as_ref()
            .map(|dispatcher| dispatcher.dispatch(occurrence))
    }

    pub async fn handle_command(&self, command: InboundCommand) -> Option<AskOutcome> {
        self.session.handle_command(command).await
    }

    /// Asks the assistant to explain the current selection.
    pub async fn explain_selection(&self) -> AskOutcome {
        self.session.ask(EXPLAIN_QUESTION).await
    }

    pub async fn web_search(&self) -> Result<WebSearchOutcome> {
        let query_prefix = self.current_query_prefix();
        self.web_search.run(&query_prefix).await
    }

    fn current_query_prefix(&self) -> String {
        let Some(storage) = &self.storage else {
            return self.settings.query_prefix.clone();
        };
        match storage.load() {
            Ok(settings) => settings.query_prefix,
            Err(e) => {
                tracing::warn!("[Extension] Using startup search settings: {}", e);
                self.settings.query_prefix.clone()
            }
        }
    }
}
