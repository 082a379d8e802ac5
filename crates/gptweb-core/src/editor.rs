//! Editor surface types.
//!
//! This module contains the raw occurrences delivered by the host editor
//! (document edits, selections, file/window/terminal lifecycle) and the
//! [`EditorSurface`] trait the application uses to query and drive it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A zero-based line/character position. `character` counts UTF-16 code units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A start/end span inside a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

impl TextRange {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the text this range covers in `document`.
    ///
    /// Positions past the end of a line or of the document are clamped, and a
    /// reversed range (end before start) is read as if normalized.
    pub fn slice<'a>(&self, document: &'a str) -> &'a str {
        let (start, end) = if self.end < self.start {
            (self.end, self.start)
        } else {
            (self.start, self.end)
        };
        let from = offset_at(document, start);
        let to = offset_at(document, end);
        &document[from..to]
    }
}

/// Converts a position into a byte offset of `document`.
fn offset_at(document: &str, position: Position) -> usize {
    let mut line_start = 0usize;
    for _ in 0..position.line {
        match document[line_start..].find('\n') {
            Some(newline) => line_start += newline + 1,
            None => return document.len(),
        }
    }

    let line_end = document[line_start..]
        .find('\n')
        .map(|newline| line_start + newline)
        .unwrap_or(document.len());
    let line = document[line_start..line_end]
        .strip_suffix('\r')
        .unwrap_or(&document[line_start..line_end]);

    let mut units = 0u32;
    for (index, ch) in line.char_indices() {
        if units >= position.character {
            return line_start + index;
        }
        units += ch.len_utf16() as u32;
    }
    line_start + line.len()
}

/// Document metadata as reported by the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    pub file_name: String,
    pub version: u32,
    pub line_count: u32,
    pub language_id: String,
}

/// Why the editor changed a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RawChangeReason {
    Undo,
    Redo,
}

/// One replaced span of a document edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentChange {
    pub range: TextRange,
    pub range_offset: u32,
    pub range_length: u32,
    pub text: String,
}

/// What moved the selection, as far as the editor can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RawSelectionSource {
    Keyboard,
    Mouse,
    Command,
}

/// Terminal metadata as reported by the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalSnapshot {
    pub name: String,
    pub process_id: Option<u32>,
    pub is_interacted_with: bool,
}

/// Raw occurrences emitted by the editor's event sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EditorOccurrence {
    TextDocumentChanged {
        document: DocumentSnapshot,
        reason: Option<RawChangeReason>,
        content_changes: Vec<ContentChange>,
    },
    SelectionChanged {
        file_name: String,
        /// Full text of the document, used to resolve the covered text.
        document_text: String,
        source: Option<RawSelectionSource>,
        selections: Vec<TextRange>,
    },
    FilesCreated {
        paths: Vec<String>,
    },
    FilesDeleted {
        paths: Vec<String>,
    },
    DocumentOpened {
        document: DocumentSnapshot,
    },
    DocumentClosed {
        document: DocumentSnapshot,
    },
    DocumentSaved {
        document: DocumentSnapshot,
    },
    ActiveEditorChanged {
        document: Option<DocumentSnapshot>,
    },
    WindowStateChanged {
        focused: bool,
    },
    TerminalOpened {
        terminal: TerminalSnapshot,
    },
    TerminalClosed {
        terminal: TerminalSnapshot,
    },
    ActiveTerminalChanged {
        terminal: Option<TerminalSnapshot>,
    },
    TerminalStateChanged {
        terminal: TerminalSnapshot,
    },
}

/// Code attached to a question: the active selection and its language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeContext {
    pub code: String,
    pub language_id: Option<String>,
}

/// The host editor, as seen by the chat session and web search.
#[async_trait]
pub trait EditorSurface: Send + Sync {
    /// The non-empty active selection, if any.
    async fn selected_code(&self) -> Option<CodeContext>;

    /// Collapses the active selection to its end.
    async fn collapse_selection(&self);

    /// Reveals the chat panel.
    async fn reveal_chat_view(&self);

    /// Opens the settings UI filtered to `key`.
    async fn open_settings(&self, key: &str);

    /// Lets the user edit a web search query; `None` when dismissed.
    async fn prompt_search_query(&self, initial: &str) -> Option<String>;

    /// Opens a URL in the external browser.
    async fn open_external(&self, url: &str);

    /// Shows a short informational notice.
    async fn show_information(&self, message: &str);
}
