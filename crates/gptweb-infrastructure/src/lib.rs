//! Infrastructure adapters for gptweb: the JSONL log sink, path resolution,
//! and settings storage.

pub mod log_sink;
pub mod paths;
pub mod storage;

pub use crate::log_sink::JsonlLogSink;
pub use crate::paths::GptWebPaths;
pub use crate::storage::SettingsStorage;
