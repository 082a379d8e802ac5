//! `gptweb chat`: hosts the extension over stdio.
//!
//! Each stdin line is a JSON object: a display command (`askQuestion`,
//! `stopGenerating`, ...), a forwarded editor occurrence
//! (`selectionChanged`, `documentOpened`, ...) or a host action
//! (`explainSelection`, `webSearch`). Each stdout line is one outbound
//! display message.

use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use gptweb_application::Extension;
use gptweb_core::editor::EditorOccurrence;
use gptweb_core::protocol::{InboundCommand, OutboundMessage};
use gptweb_infrastructure::SettingsStorage;
use gptweb_interaction::OpenAIApiAgent;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinSet;

use crate::headless::HeadlessEditor;

#[derive(Deserialize)]
#[serde(untagged)]
enum HostInput {
    Command(InboundCommand),
    Occurrence(EditorOccurrence),
    Action(HostAction),
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum HostAction {
    ExplainSelection,
    WebSearch,
}

pub async fn run(storage: SettingsStorage) -> Result<()> {
    let settings = storage.load_effective()?;
    if !settings.has_api_key() {
        tracing::warn!("[Chat] No API key configured; run `gptweb set-key` first");
    }

    let client = Arc::new(OpenAIApiAgent::from_settings(&settings));
    let editor = Arc::new(HeadlessEditor::new());
    let extension = Arc::new(
        Extension::activate(settings, client, editor.clone(), Local::now())
            .with_settings_storage(Arc::new(storage)),
    );

    let writer = tokio::spawn(write_outbound(extension.bridge().attach()));
    let mut questions = JoinSet::new();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let input: HostInput = match serde_json::from_str(line) {
            Ok(input) => input,
            Err(e) => {
                tracing::warn!("[Chat] Ignoring unrecognized input: {}", e);
                continue;
            }
        };

        match input {
            // questions run in the background so stop/clear stay responsive
            HostInput::Command(InboundCommand::AskQuestion { value }) => {
                let extension = extension.clone();
                questions.spawn(async move {
                    extension.session().ask(&value).await;
                });
            }
            HostInput::Command(command) => {
                extension.handle_command(command).await;
            }
            HostInput::Occurrence(occurrence) => {
                editor.observe(&occurrence);
                extension.on_editor_occurrence(&occurrence);
            }
            HostInput::Action(HostAction::ExplainSelection) => {
                let extension = extension.clone();
                questions.spawn(async move {
                    extension.explain_selection().await;
                });
            }
            HostInput::Action(HostAction::WebSearch) => {
                if let Err(e) = extension.web_search().await {
                    tracing::warn!("[Chat] Web search failed: {}", e);
                }
            }
        }
    }

    tracing::debug!("[Chat] Input closed, waiting for {} questions", questions.len());
    while questions.join_next().await.is_some() {}

    extension.bridge().detach();
    writer.await??;
    Ok(())
}

async fn write_outbound(mut outbound: UnboundedReceiver<OutboundMessage>) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    while let Some(message) = outbound.recv().await {
        let mut line = serde_json::to_string(&message)?;
        line.push('\n');
        stdout.write_all(line.as_bytes()).await?;
        stdout.flush().await?;
    }
    Ok(())
}
