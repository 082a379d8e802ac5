use super::message::{ConversationMessage, MessageRole};

/// Instruction given to the model at the start of every conversation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a highly intelligent AI chatbot that has deep understanding of any programming language and its API documentations. I might provide you with a code block and your role is to provide a comprehensive answer to any questions or requests that I will ask about the code block. Please answer as briefly as possible without sacrificing completeness. It is very important that you provide accurate answers and answer in markdown format.";

/// Ordered transcript backing one chat session.
///
/// The system turn is inserted at construction. Human and assistant turns can
/// only be added together through [`ConversationMemory::record_exchange`], so
/// they always alternate. A reset replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationMemory {
    messages: Vec<ConversationMessage>,
}

impl ConversationMemory {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ConversationMessage::system(system_prompt)],
        }
    }

    /// Transcript to send for a new question: every turn so far plus `human`.
    pub fn transcript_with(&self, human: &str) -> Vec<ConversationMessage> {
        let mut transcript = self.messages.clone();
        transcript.push(ConversationMessage::human(human));
        transcript
    }

    /// Appends a completed human/assistant exchange.
    pub fn record_exchange(&mut self, human: impl Into<String>, assistant: impl Into<String>) {
        self.messages.push(ConversationMessage::human(human));
        self.messages.push(ConversationMessage::assistant(assistant));
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of completed exchanges.
    pub fn exchanges(&self) -> usize {
        self.messages
            .iter()
            .filter(|message| message.role == MessageRole::Assistant)
            .count()
    }

    /// True when only the system turn is present.
    pub fn is_fresh(&self) -> bool {
        self.messages.len() == 1 && self.messages[0].role == MessageRole::System
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_memory_holds_only_system_turn() {
        let memory = ConversationMemory::new("be helpful");
        assert!(memory.is_fresh());
        assert_eq!(memory.messages()[0].content, "be helpful");
        assert_eq!(memory.exchanges(), 0);
    }

    #[test]
    fn test_transcript_does_not_mutate_memory() {
        let memory = ConversationMemory::default();
        let transcript = memory.transcript_with("what is this?");

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].role, MessageRole::Human);
        assert!(memory.is_fresh());
    }

    #[test]
    fn test_exchanges_alternate() {
        let mut memory = ConversationMemory::default();
        memory.record_exchange("q1", "a1");
        memory.record_exchange("q2", "a2");

        let roles: Vec<MessageRole> = memory.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::System,
                MessageRole::Human,
                MessageRole::Assistant,
                MessageRole::Human,
                MessageRole::Assistant,
            ]
        );
        assert_eq!(memory.exchanges(), 2);
    }
}
