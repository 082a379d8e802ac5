//! Path resolution for settings and telemetry logs.
//!
//! ```text
//! <config_dir>/gptweb/
//! └── config.toml          # Settings
//!
//! <outputDirectory>/       # from Settings, `~` expanded
//! └── log_10-16-2026_3-04-05_PM.txt
//! ```

use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Local};
use gptweb_core::error::{GptWebError, Result};

const APP_DIR: &str = "gptweb";
const SETTINGS_FILE: &str = "config.toml";

pub struct GptWebPaths;

impl GptWebPaths {
    /// Returns the gptweb configuration directory (e.g. `~/.config/gptweb/`).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| GptWebError::config("Cannot find configuration directory"))
    }

    /// Returns the default settings file path.
    pub fn settings_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(SETTINGS_FILE))
    }

    /// Expands `~` components of a configured output directory.
    pub fn expand_output_dir(raw: &str) -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::expand_with_home(raw, &home)
    }

    fn expand_with_home(raw: &str, home: &Path) -> PathBuf {
        Path::new(raw)
            .components()
            .map(|component| match component {
                Component::Normal(part) if part == "~" => home.as_os_str().to_owned(),
                other => other.as_os_str().to_owned(),
            })
            .collect()
    }

    /// Log file name derived from the session creation time,
    /// e.g. `log_10-16-2026_3-04-05_PM.txt`.
    pub fn log_file_name(created_at: DateTime<Local>) -> String {
        format!("log_{}.txt", created_at.format("%-m-%-d-%Y_%-I-%M-%S_%p"))
    }

    /// Full log path for a session started at `created_at`.
    pub fn log_file(output_dir: &Path, created_at: DateTime<Local>) -> PathBuf {
        output_dir.join(Self::log_file_name(created_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_expand_tilde_component() {
        let home = Path::new("/home/dev");
        assert_eq!(
            GptWebPaths::expand_with_home("~/logs/gptweb", home),
            PathBuf::from("/home/dev/logs/gptweb")
        );
        assert_eq!(
            GptWebPaths::expand_with_home("/var/log", home),
            PathBuf::from("/var/log")
        );
    }

    #[test]
    fn test_log_file_name_format() {
        let created = Local.with_ymd_and_hms(2026, 10, 16, 15, 4, 5).unwrap();
        assert_eq!(
            GptWebPaths::log_file_name(created),
            "log_10-16-2026_3-04-05_PM.txt"
        );
    }
}
