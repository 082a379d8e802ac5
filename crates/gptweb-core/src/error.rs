//! Error types for gptweb.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::remote::RemoteError;

/// A shared error type for the telemetry and chat subsystems.
///
/// Telemetry variants (`PathUnavailable`, `WriteFailed`) and chat variants
/// (`InvalidCredential`, `RemoteRequestFailed`, `EmptyInput`) never cross
/// over: a failure in one subsystem is handled inside it.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum GptWebError {
    /// The log directory could not be created.
    #[error("Log path unavailable: {path} ({message})")]
    PathUnavailable { path: String, message: String },

    /// A single telemetry append was lost.
    #[error("Log write failed: {message}")]
    WriteFailed { message: String },

    /// API key validation failed.
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// The remote completion call failed.
    #[error("Remote request failed: {0}")]
    RemoteRequestFailed(RemoteError),

    /// Blank input, silently ignored by callers.
    #[error("Empty input")]
    EmptyInput,

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error outside of the log sink
    #[error("IO error: {message}")]
    Io { message: String },
}

impl GptWebError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a PathUnavailable error
    pub fn path_unavailable(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PathUnavailable {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a WriteFailed error
    pub fn write_failed(message: impl Into<String>) -> Self {
        Self::WriteFailed {
            message: message.into(),
        }
    }

    /// Creates an InvalidCredential error
    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::InvalidCredential(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a credential error
    pub fn is_invalid_credential(&self) -> bool {
        matches!(self, Self::InvalidCredential(_))
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for GptWebError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for GptWebError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for GptWebError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for GptWebError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<RemoteError> for GptWebError {
    fn from(err: RemoteError) -> Self {
        Self::RemoteRequestFailed(err)
    }
}

/// A type alias for `Result<T, GptWebError>`.
pub type Result<T> = std::result::Result<T, GptWebError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_are_classified() {
        assert!(GptWebError::invalid_credential("bad key").is_invalid_credential());
        assert!(!GptWebError::write_failed("disk full").is_invalid_credential());
        let json: GptWebError = serde_json::from_str::<u8>("x").unwrap_err().into();
        assert!(json.is_serialization());
        assert!(!GptWebError::EmptyInput.is_serialization());
    }

    #[test]
    fn test_io_error_conversion_keeps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: GptWebError = io.into();
        assert!(err.to_string().contains("PermissionDenied"));
    }
}
