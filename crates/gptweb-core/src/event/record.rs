use serde::{Deserialize, Serialize};

use super::kind::EventKind;
use crate::editor::{ContentChange, TextRange};
use crate::error::{GptWebError, Result};

/// Terminator appended after every serialized record.
pub const LINE_TERMINATOR: &str = "\r\n";

/// One immutable, timestamped telemetry entry.
///
/// Records are built at occurrence time, serialized once, and dropped. Fields
/// are only readable; there is no way to change a record after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    kind: EventKind,
    event_name: String,
    /// Unix time in milliseconds.
    timestamp: i64,
    detail: EventDetail,
}

/// Variant-specific body of an [`EventRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EventDetail {
    /// Generic action, file, document, window, search or chat occurrence.
    User {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payload: Option<UserPayload>,
    },
    TextChange {
        filename: String,
        change_reason: ChangeReason,
        content_changes: Vec<ContentChange>,
        document_meta: DocumentMeta,
    },
    TextSelection {
        filename: String,
        selection_kind: SelectionKind,
        selections: Vec<TextRange>,
        selected_text: String,
    },
    Terminal {
        terminal_name: String,
        is_interacted_with: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        process_id: Option<u32>,
    },
}

/// Structured data attached to a user event, one shape per occurrence family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum UserPayload {
    Document {
        version: u32,
        line_count: u32,
        language_id: String,
    },
    Files {
        paths: Vec<String>,
    },
    Window {
        focused: bool,
    },
    Request {
        has_code: bool,
    },
}

/// Document metadata carried by text change records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub version: u32,
    pub line_count: u32,
    pub language_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeReason {
    Undo,
    Redo,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionKind {
    Mouse,
    Keyboard,
    Command,
}

impl EventRecord {
    /// Builds a `UserEvent` record.
    pub fn user(
        kind: EventKind,
        event_name: impl Into<String>,
        timestamp: i64,
        action: Option<String>,
        content: Option<String>,
        payload: Option<UserPayload>,
    ) -> Self {
        Self {
            kind,
            event_name: event_name.into(),
            timestamp,
            detail: EventDetail::User {
                action,
                content,
                payload,
            },
        }
    }

    /// Builds a `TextChangeEvent` record (kind `TextChanges`).
    pub fn text_change(
        event_name: impl Into<String>,
        timestamp: i64,
        filename: impl Into<String>,
        change_reason: ChangeReason,
        content_changes: Vec<ContentChange>,
        document_meta: DocumentMeta,
    ) -> Self {
        Self {
            kind: EventKind::TextChanges,
            event_name: event_name.into(),
            timestamp,
            detail: EventDetail::TextChange {
                filename: filename.into(),
                change_reason,
                content_changes,
                document_meta,
            },
        }
    }

    /// Builds a `TextSelectionEvent` record (kind `TextSelections`).
    pub fn text_selection(
        event_name: impl Into<String>,
        timestamp: i64,
        filename: impl Into<String>,
        selection_kind: SelectionKind,
        selections: Vec<TextRange>,
        selected_text: impl Into<String>,
    ) -> Self {
        Self {
            kind: EventKind::TextSelections,
            event_name: event_name.into(),
            timestamp,
            detail: EventDetail::TextSelection {
                filename: filename.into(),
                selection_kind,
                selections,
                selected_text: selected_text.into(),
            },
        }
    }

    /// Builds a `TerminalEvent` record (kind `TerminalState`).
    pub fn terminal(
        event_name: impl Into<String>,
        timestamp: i64,
        terminal_name: impl Into<String>,
        is_interacted_with: bool,
        process_id: Option<u32>,
    ) -> Self {
        Self {
            kind: EventKind::TerminalState,
            event_name: event_name.into(),
            timestamp,
            detail: EventDetail::Terminal {
                terminal_name: terminal_name.into(),
                is_interacted_with,
                process_id,
            },
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn detail(&self) -> &EventDetail {
        &self.detail
    }

    /// Serializes to one JSON object followed by CRLF.
    pub fn to_line(&self) -> Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push_str(LINE_TERMINATOR);
        Ok(line)
    }

    /// Parses one line produced by [`EventRecord::to_line`].
    pub fn from_line(line: &str) -> Result<Self> {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            return Err(GptWebError::Serialization {
                format: "JSON".to_string(),
                message: "empty log line".to_string(),
            });
        }
        Ok(serde_json::from_str(trimmed)?)
    }
}
