//! User settings consumed by the extension.

use serde::{Deserialize, Serialize};

/// Placeholder replaced by the encoded query in [`Settings::query_prefix`].
pub const SELECTION_PLACEHOLDER: &str = "%SELECTION%";

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// Settings keys as they appear in the settings UI.
pub mod keys {
    pub const API_KEY: &str = "gptweb.apiKey";
    pub const SEARCH_ENGINE: &str = "gptweb.searchEngine";
}

/// Extension settings. Read by the core, never written by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub api_key: String,
    pub search_engine: String,
    /// Directory for telemetry logs; a `~` component means the home directory.
    pub output_directory: String,
    /// Search URL template containing [`SELECTION_PLACEHOLDER`].
    pub query_prefix: String,
    pub model: String,
    pub temperature: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            search_engine: "google".to_string(),
            output_directory: "~/gptweb-logs".to_string(),
            query_prefix: format!("https://www.google.com/search?q={SELECTION_PLACEHOLDER}"),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl Settings {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
