//! Conversation transcript types.
//!
//! - `message`: [`MessageRole`], [`ConversationMessage`]
//! - `memory`: [`ConversationMemory`], the transcript owned by one chat session

mod memory;
mod message;

pub use memory::{ConversationMemory, DEFAULT_SYSTEM_PROMPT};
pub use message::{ConversationMessage, MessageRole};
