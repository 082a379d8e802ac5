//! Settings file storage.
//!
//! Settings live in a TOML file. Reads tolerate a missing or empty file by
//! returning defaults; writes go through a temp file + fsync + rename under an
//! exclusive lock so a crash never leaves a half-written file behind.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use gptweb_core::config::Settings;
use gptweb_core::error::{GptWebError, Result};

/// Environment variable that supplies an API key when none is stored.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

pub struct SettingsStorage {
    path: PathBuf,
}

impl SettingsStorage {
    /// Creates a storage handle for the given settings file.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Creates a storage handle for the default settings file.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(crate::paths::GptWebPaths::settings_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored settings.
    ///
    /// # Returns
    ///
    /// - `Ok(Settings)`: parsed settings, or defaults if the file is missing or empty
    /// - `Err`: the file exists but cannot be read or parsed
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }

        Ok(toml::from_str(&content)?)
    }

    /// Loads settings and fills an empty API key from `OPENAI_API_KEY`.
    pub fn load_effective(&self) -> Result<Settings> {
        let settings = self.load()?;
        Ok(with_env_api_key(settings, std::env::var(API_KEY_ENV).ok()))
    }

    /// Saves settings atomically.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let _lock = FileLock::acquire(&self.path)?;
        self.write_atomic(settings)
    }

    /// Loads, modifies and saves settings while holding the lock.
    pub fn update<F>(&self, f: F) -> Result<Settings>
    where
        F: FnOnce(&mut Settings),
    {
        let _lock = FileLock::acquire(&self.path)?;
        let mut settings = self.load()?;
        f(&mut settings);
        self.write_atomic(&settings)?;
        Ok(settings)
    }

    fn write_atomic(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let toml_string = toml::to_string_pretty(settings)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!("[SettingsStorage] Saved settings to {}", self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| GptWebError::io("Path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| GptWebError::io("Path has no file name"))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// Uses `env_key` when the stored key is blank.
fn with_env_api_key(mut settings: Settings, env_key: Option<String>) -> Settings {
    if !settings.has_api_key() {
        if let Some(key) = env_key.filter(|key| !key.trim().is_empty()) {
            settings.api_key = key;
        }
    }
    settings
}

/// Exclusive lock held for the duration of a write.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| GptWebError::io(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}
