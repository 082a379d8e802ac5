pub mod chat;
pub mod set_key;

use std::path::PathBuf;

use anyhow::Result;
use gptweb_infrastructure::SettingsStorage;

/// Settings storage at `path`, or at the default location.
pub fn open_storage(path: Option<PathBuf>) -> Result<SettingsStorage> {
    Ok(match path {
        Some(path) => SettingsStorage::new(path),
        None => SettingsStorage::default_location()?,
    })
}
