//! Storage layer for settings files.

mod settings_storage;

pub use settings_storage::{API_KEY_ENV, SettingsStorage};
