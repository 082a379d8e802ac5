//! Domain layer for gptweb.
//!
//! Holds the telemetry record model, the conversation and session state of the
//! chat assistant, the display protocol vocabulary, and the traits through
//! which the application layer talks to its collaborators (log sink, remote
//! completion service, editor surface).

pub mod config;
pub mod conversation;
pub mod editor;
pub mod error;
pub mod event;
pub mod protocol;
pub mod remote;
pub mod session;
pub mod sink;

// Re-export common error type
pub use error::GptWebError;
