//! Remote completion collaborators for gptweb.

pub mod openai_api_agent;

pub use openai_api_agent::OpenAIApiAgent;
