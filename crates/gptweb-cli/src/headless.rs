//! Editor surface for a host without a UI.
//!
//! The selection and document language are tracked from the occurrences the
//! host forwards. Requests that would need a UI are logged instead.

use std::sync::Mutex;

use async_trait::async_trait;
use gptweb_core::editor::{CodeContext, EditorOccurrence, EditorSurface};

#[derive(Default)]
pub struct HeadlessEditor {
    state: Mutex<EditorState>,
}

#[derive(Default)]
struct EditorState {
    language_id: Option<String>,
    selection: Option<String>,
}

impl HeadlessEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the tracked selection and language from a forwarded occurrence.
    pub fn observe(&self, occurrence: &EditorOccurrence) {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        match occurrence {
            EditorOccurrence::SelectionChanged {
                document_text,
                selections,
                ..
            } => {
                state.selection = selections
                    .first()
                    .map(|range| range.slice(document_text))
                    .filter(|text| !text.is_empty())
                    .map(str::to_string);
            }
            EditorOccurrence::ActiveEditorChanged { document } => {
                state.language_id = document.as_ref().map(|d| d.language_id.clone());
                state.selection = None;
            }
            EditorOccurrence::DocumentOpened { document } if state.language_id.is_none() => {
                state.language_id = Some(document.language_id.clone());
            }
            _ => {}
        }
    }
}

#[async_trait]
impl EditorSurface for HeadlessEditor {
    async fn selected_code(&self) -> Option<CodeContext> {
        let state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        state.selection.as_ref().map(|code| CodeContext {
            code: code.clone(),
            language_id: state.language_id.clone(),
        })
    }

    async fn collapse_selection(&self) {
        self.state.lock().unwrap_or_else(|p| p.into_inner()).selection = None;
    }

    async fn reveal_chat_view(&self) {}

    async fn open_settings(&self, key: &str) {
        tracing::info!("[HeadlessEditor] Edit `{}` with `gptweb set-key` or the config file", key);
    }

    async fn prompt_search_query(&self, initial: &str) -> Option<String> {
        // no input box: accept the proposed query
        Some(initial.to_string())
    }

    async fn open_external(&self, url: &str) {
        tracing::info!("[HeadlessEditor] Open {}", url);
    }

    async fn show_information(&self, message: &str) {
        tracing::info!("[HeadlessEditor] {}", message);
    }
}
