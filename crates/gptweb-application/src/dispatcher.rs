//! Event taxonomy dispatcher.
//!
//! Translates raw editor occurrences into [`EventRecord`]s, drops noise, and
//! writes what remains to the [`EventSink`] synchronously and in arrival
//! order. Write failures are reported on the diagnostic channel and otherwise
//! swallowed: telemetry must never disturb the editor or the chat session.

use std::sync::Arc;

use gptweb_core::editor::{
    DocumentSnapshot, EditorOccurrence, RawChangeReason, RawSelectionSource, TerminalSnapshot,
};
use gptweb_core::event::{
    ChangeReason, DocumentMeta, EventClock, EventKind, EventRecord, SelectionKind, UserPayload,
};
use gptweb_core::sink::EventSink;

pub mod names {
    pub const TEXT_DOCUMENT_CHANGED: &str = "onDidChangeTextDocument";
    pub const SELECTION_CHANGED: &str = "onDidChangeTextEditorSelection";
    pub const FILES_CREATED: &str = "onDidCreateFiles";
    pub const FILES_DELETED: &str = "onDidDeleteFiles";
    pub const DOCUMENT_OPENED: &str = "onDidOpenTextDocument";
    pub const DOCUMENT_CLOSED: &str = "onDidCloseTextDocument";
    pub const DOCUMENT_SAVED: &str = "onDidSaveTextDocument";
    pub const ACTIVE_EDITOR_CHANGED: &str = "onDidChangeActiveTextEditor";
    pub const WINDOW_STATE_CHANGED: &str = "onDidChangeWindowState";
    pub const TERMINAL_OPENED: &str = "onDidOpenTerminal";
    pub const TERMINAL_CLOSED: &str = "onDidCloseTerminal";
    pub const ACTIVE_TERMINAL_CHANGED: &str = "onDidChangeActiveTerminal";
    pub const TERMINAL_STATE_CHANGED: &str = "onDidChangeTerminalState";
    pub const SEARCH_QUERY_PROMPTED: &str = "onShowSearchQueryBox";
    pub const WEB_SEARCH: &str = "onWebSearch";
    pub const CHAT_REQUEST: &str = "askQuestion";
    pub const CHAT_RESPONSE: &str = "addResponse";
}

/// What happened to one occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A record of this kind was appended.
    Recorded(EventKind),
    /// Filtered out by policy or carried nothing to record.
    Suppressed,
    /// The sink rejected the write; the record is gone.
    Lost,
}

pub struct EventDispatcher {
    sink: Arc<dyn EventSink>,
    clock: EventClock,
}

impl EventDispatcher {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            clock: EventClock::new(),
        }
    }

    /// Translates and records one editor occurrence.
    pub fn dispatch(&self, occurrence: &EditorOccurrence) -> DispatchOutcome {
        match self.translate(occurrence) {
            Some(record) => self.record(record),
            None => DispatchOutcome::Suppressed,
        }
    }

    /// Builds the record for `occurrence`, or `None` if nothing should be logged.
    pub fn translate(&self, occurrence: &EditorOccurrence) -> Option<EventRecord> {
        let now = self.clock.now_millis();

        let record = match occurrence {
            EditorOccurrence::TextDocumentChanged {
                document,
                reason,
                content_changes,
            } => EventRecord::text_change(
                names::TEXT_DOCUMENT_CHANGED,
                now,
                document.file_name.clone(),
                change_reason(*reason),
                content_changes.clone(),
                DocumentMeta {
                    version: document.version,
                    line_count: document.line_count,
                    language_id: document.language_id.clone(),
                },
            ),
            EditorOccurrence::SelectionChanged {
                file_name,
                document_text,
                source,
                selections,
            } => {
                let primary = selections.first()?;
                let selected_text = primary.slice(document_text);
                if is_noise_selection(selected_text) {
                    return None;
                }
                EventRecord::text_selection(
                    names::SELECTION_CHANGED,
                    now,
                    file_name.clone(),
                    selection_kind(*source),
                    selections.clone(),
                    selected_text,
                )
            }
            EditorOccurrence::FilesCreated { paths } => {
                files_event(names::FILES_CREATED, now, paths)?
            }
            EditorOccurrence::FilesDeleted { paths } => {
                files_event(names::FILES_DELETED, now, paths)?
            }
            EditorOccurrence::DocumentOpened { document } => {
                document_event(names::DOCUMENT_OPENED, now, document)
            }
            EditorOccurrence::DocumentClosed { document } => {
                document_event(names::DOCUMENT_CLOSED, now, document)
            }
            EditorOccurrence::DocumentSaved { document } => {
                document_event(names::DOCUMENT_SAVED, now, document)
            }
            EditorOccurrence::ActiveEditorChanged { document } => {
                document_event(names::ACTIVE_EDITOR_CHANGED, now, document.as_ref()?)
            }
            EditorOccurrence::WindowStateChanged { focused } => EventRecord::user(
                EventKind::WindowState,
                names::WINDOW_STATE_CHANGED,
                now,
                None,
                Some(if *focused { "focused" } else { "unfocused" }.to_string()),
                Some(UserPayload::Window { focused: *focused }),
            ),
            EditorOccurrence::TerminalOpened { terminal } => {
                terminal_event(names::TERMINAL_OPENED, now, terminal)
            }
            EditorOccurrence::TerminalClosed { terminal } => {
                terminal_event(names::TERMINAL_CLOSED, now, terminal)
            }
            EditorOccurrence::ActiveTerminalChanged { terminal } => {
                terminal_event(names::ACTIVE_TERMINAL_CHANGED, now, terminal.as_ref()?)
            }
            EditorOccurrence::TerminalStateChanged { terminal } => {
                terminal_event(names::TERMINAL_STATE_CHANGED, now, terminal)
            }
        };

        Some(record)
    }

    /// Appends a record, reporting but not propagating write failures.
    pub fn record(&self, record: EventRecord) -> DispatchOutcome {
        let kind = record.kind();
        match self.sink.append(&record) {
            Ok(()) => DispatchOutcome::Recorded(kind),
            Err(e) => {
                tracing::warn!(
                    kind = kind.as_str(),
                    event_name = record.event_name(),
                    "[EventDispatcher] Telemetry record lost: {}",
                    e
                );
                DispatchOutcome::Lost
            }
        }
    }

    /// Records a question sent to the assistant.
    pub fn record_chat_request(&self, prompt: &str, has_code: bool) -> DispatchOutcome {
        self.record(EventRecord::user(
            EventKind::AddRequest,
            names::CHAT_REQUEST,
            self.clock.now_millis(),
            None,
            Some(prompt.to_string()),
            Some(UserPayload::Request { has_code }),
        ))
    }

    /// Records an answer received from the assistant.
    pub fn record_chat_response(&self, response: &str) -> DispatchOutcome {
        self.record(EventRecord::user(
            EventKind::AddResponse,
            names::CHAT_RESPONSE,
            self.clock.now_millis(),
            None,
            Some(response.to_string()),
            None,
        ))
    }

    /// Records a generic user action (web search and the like).
    pub fn record_action(
        &self,
        kind: EventKind,
        event_name: &str,
        action: &str,
        content: &str,
    ) -> DispatchOutcome {
        self.record(EventRecord::user(
            kind,
            event_name,
            self.clock.now_millis(),
            Some(action.to_string()),
            Some(content.to_string()),
            None,
        ))
    }
}

/// Cursor-only movements: nothing but whitespace, a lone newline or a lone tab.
fn is_noise_selection(text: &str) -> bool {
    text.trim().is_empty() || text == "\n" || text == "\t"
}

fn change_reason(reason: Option<RawChangeReason>) -> ChangeReason {
    match reason {
        Some(RawChangeReason::Undo) => ChangeReason::Undo,
        Some(RawChangeReason::Redo) => ChangeReason::Redo,
        None => ChangeReason::Unknown,
    }
}

fn selection_kind(source: Option<RawSelectionSource>) -> SelectionKind {
    match source {
        Some(RawSelectionSource::Mouse) => SelectionKind::Mouse,
        Some(RawSelectionSource::Keyboard) => SelectionKind::Keyboard,
        // programmatic changes report no source
        Some(RawSelectionSource::Command) | None => SelectionKind::Command,
    }
}

fn files_event(event_name: &str, now: i64, paths: &[String]) -> Option<EventRecord> {
    let first = paths.first()?;
    Some(EventRecord::user(
        EventKind::FileOperation,
        event_name,
        now,
        None,
        Some(first.clone()),
        Some(UserPayload::Files {
            paths: paths.to_vec(),
        }),
    ))
}

fn document_event(event_name: &str, now: i64, document: &DocumentSnapshot) -> EventRecord {
    EventRecord::user(
        EventKind::DocumentState,
        event_name,
        now,
        None,
        Some(document.file_name.clone()),
        Some(UserPayload::Document {
            version: document.version,
            line_count: document.line_count,
            language_id: document.language_id.clone(),
        }),
    )
}

fn terminal_event(event_name: &str, now: i64, terminal: &TerminalSnapshot) -> EventRecord {
    EventRecord::terminal(
        event_name,
        now,
        terminal.name.clone(),
        terminal.is_interacted_with,
        terminal.process_id,
    )
}
