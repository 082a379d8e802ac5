//! Application layer for gptweb.
//!
//! This crate wires the domain types of `gptweb-core` into the two running
//! subsystems: the telemetry pipeline ([`EventDispatcher`]) and the chat
//! assistant ([`ChatSession`] talking to its surface through a
//! [`DisplayBridge`]). [`Extension`] is the composition root a host embeds.

pub mod bridge;
pub mod chat_session;
pub mod credential_service;
pub mod dispatcher;
pub mod error_classifier;
pub mod extension;
pub mod web_search;

pub use bridge::DisplayBridge;
pub use chat_session::{AskOutcome, ChatSession, ChatSessionConfig};
pub use credential_service::CredentialService;
pub use dispatcher::{DispatchOutcome, EventDispatcher};
pub use error_classifier::classify_remote_error;
pub use extension::Extension;
pub use web_search::{WebSearch, WebSearchOutcome};
