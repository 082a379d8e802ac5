//! Web search for the selected code.

use std::sync::Arc;

use gptweb_core::GptWebError;
use gptweb_core::config::SELECTION_PLACEHOLDER;
use gptweb_core::editor::{CodeContext, EditorSurface};
use gptweb_core::error::Result;
use gptweb_core::event::EventKind;

use crate::dispatcher::{EventDispatcher, names};

const NO_SELECTION_NOTICE: &str = "No text selected";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebSearchOutcome {
    /// Nothing was selected; the user was notified.
    NoSelection,
    /// The user dismissed or cleared the query box.
    Dismissed,
    /// The search page was opened at this URL.
    Opened(String),
}

/// Initial query for a selection: its text on one line, followed by its language.
pub fn default_search_query(context: &CodeContext) -> String {
    let text = context.code.replace("\r\n", " ").replace('\n', " ");
    match context.language_id.as_deref().filter(|id| !id.is_empty()) {
        Some(language) => format!("{text} {language}"),
        None => text,
    }
}

/// Substitutes the encoded `query` for the placeholder in `query_prefix`.
pub fn build_search_url(query_prefix: &str, query: &str) -> Result<String> {
    if !query_prefix.contains(SELECTION_PLACEHOLDER) {
        return Err(GptWebError::config(format!(
            "queryPrefix must contain {SELECTION_PLACEHOLDER}: {query_prefix}"
        )));
    }

    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    Ok(query_prefix.replacen(SELECTION_PLACEHOLDER, &encoded, 1))
}

pub struct WebSearch {
    editor: Arc<dyn EditorSurface>,
    telemetry: Option<Arc<EventDispatcher>>,
}

impl WebSearch {
    pub fn new(editor: Arc<dyn EditorSurface>, telemetry: Option<Arc<EventDispatcher>>) -> Self {
        Self { editor, telemetry }
    }

    /// Searches the web for the current selection.
    ///
    /// The user edits the proposed query before the search page is opened.
    pub async fn run(&self, query_prefix: &str) -> Result<WebSearchOutcome> {
        let Some(selection) = self
            .editor
            .selected_code()
            .await
            .filter(|context| !context.code.is_empty())
        else {
            self.editor.show_information(NO_SELECTION_NOTICE).await;
            return Ok(WebSearchOutcome::NoSelection);
        };

        let initial = default_search_query(&selection);
        self.log(
            names::SEARCH_QUERY_PROMPTED,
            "openSearchQueryBox",
            initial.trim(),
        );

        let query = match self.editor.prompt_search_query(&initial).await {
            Some(query) if !query.trim().is_empty() => query,
            _ => return Ok(WebSearchOutcome::Dismissed),
        };

        let url = build_search_url(query_prefix, &query)?;
        self.log(names::WEB_SEARCH, "webSearch", &url);

        tracing::debug!("[WebSearch] Opening {}", url);
        self.editor.open_external(&url).await;
        Ok(WebSearchOutcome::Opened(url))
    }

    fn log(&self, event_name: &str, action: &str, content: &str) {
        if let Some(telemetry) = &self.telemetry {
            telemetry.record_action(EventKind::WebSearch, event_name, action, content);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_flattens_lines() {
        let context = CodeContext {
            code: "let v = vec![];\nv.push(1);".to_string(),
            language_id: Some("rust".to_string()),
        };
        assert_eq!(default_search_query(&context), "let v = vec![]; v.push(1); rust");
    }

    #[test]
    fn test_build_search_url_encodes_query() {
        let url = build_search_url("https://www.google.com/search?q=%SELECTION%", "a&b c").unwrap();
        assert_eq!(url, "https://www.google.com/search?q=a%26b+c");
    }

    #[test]
    fn test_build_search_url_requires_placeholder() {
        let err = build_search_url("https://example.com/search", "x").unwrap_err();
        assert!(matches!(err, GptWebError::Config(_)));
    }
}
