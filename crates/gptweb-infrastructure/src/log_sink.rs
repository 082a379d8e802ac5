//! Append-only JSONL writer for telemetry records.
//!
//! One file per session. Each [`JsonlLogSink::append`] issues a single
//! `write_all` of the complete CRLF-terminated line and returns only after the
//! write completes, so the file order is the call order. Nothing is buffered,
//! retried, rotated or rewritten.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use gptweb_core::error::{GptWebError, Result};
use gptweb_core::event::EventRecord;
use gptweb_core::sink::EventSink;

use crate::paths::GptWebPaths;

pub struct JsonlLogSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlLogSink {
    /// Opens (creating if needed) the log file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `PathUnavailable` if the containing directory cannot be created
    /// or the file cannot be opened for appending.
    pub fn initialize(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    GptWebError::path_unavailable(parent.display().to_string(), e.to_string())
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| GptWebError::path_unavailable(path.display().to_string(), e.to_string()))?;

        tracing::info!("[LogSink] Logging user actions to: {}", path.display());

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Opens a fresh log for a session started at `created_at` inside `output_dir`.
    pub fn for_session(output_dir: &Path, created_at: DateTime<Local>) -> Result<Self> {
        Self::initialize(GptWebPaths::log_file(output_dir, created_at))
    }

    /// Path of the active log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSink for JsonlLogSink {
    fn append(&self, record: &EventRecord) -> Result<()> {
        let line = record
            .to_line()
            .map_err(|e| GptWebError::write_failed(e.to_string()))?;

        let mut file = self
            .file
            .lock()
            .map_err(|e| GptWebError::write_failed(format!("log file lock poisoned: {e}")))?;

        file.write_all(line.as_bytes())
            .map_err(|e| GptWebError::write_failed(e.to_string()))?;

        Ok(())
    }
}

impl std::fmt::Debug for JsonlLogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonlLogSink")
            .field("path", &self.path)
            .finish()
    }
}
