use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::conversation::ConversationMemory;

/// Length of generated message ids.
pub const MESSAGE_ID_LEN: usize = 32;

/// Generates a random alphanumeric message id.
pub fn new_message_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(MESSAGE_ID_LEN)
        .map(char::from)
        .collect()
}

/// Handle for one outstanding remote request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightTicket {
    id: u64,
    generation: u64,
    message_id: String,
}

impl FlightTicket {
    pub fn message_id(&self) -> &str {
        &self.message_id
    }
}

/// Mutable state of one chat session.
///
/// `generation` advances on every reset or stop. A result whose ticket carries
/// an older generation belongs to a conversation the user abandoned and must
/// not touch the current memory.
#[derive(Debug)]
pub struct SessionState {
    in_flight: Option<u64>,
    next_ticket: u64,
    question_counter: u32,
    current_message_id: String,
    generation: u64,
    system_prompt: String,
    memory: ConversationMemory,
}

impl SessionState {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        let system_prompt = system_prompt.into();
        Self {
            in_flight: None,
            next_ticket: 0,
            question_counter: 0,
            current_message_id: String::new(),
            generation: 0,
            memory: ConversationMemory::new(system_prompt.clone()),
            system_prompt,
        }
    }

    /// True exactly while a request is outstanding.
    pub fn in_progress(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn question_counter(&self) -> u32 {
        self.question_counter
    }

    pub fn current_message_id(&self) -> &str {
        &self.current_message_id
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Claims the single flight slot for a new question.
    ///
    /// Returns `None` (and changes nothing) if a request is already outstanding.
    pub fn begin_question(&mut self) -> Option<FlightTicket> {
        if self.in_progress() {
            return None;
        }

        self.question_counter += 1;
        self.next_ticket += 1;
        self.current_message_id = new_message_id();
        self.in_flight = Some(self.next_ticket);

        Some(FlightTicket {
            id: self.next_ticket,
            generation: self.generation,
            message_id: self.current_message_id.clone(),
        })
    }

    /// Whether a result for `ticket` may still be applied to the memory.
    pub fn is_current(&self, ticket: &FlightTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Records a successful exchange if `ticket` is still current.
    ///
    /// Returns `false` when the result was discarded as stale.
    pub fn record_exchange(&mut self, ticket: &FlightTicket, human: &str, assistant: &str) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.memory.record_exchange(human, assistant);
        true
    }

    /// Releases the flight slot if `ticket` still holds it.
    ///
    /// Returns `true` when the slot was released by this call.
    pub fn finish(&mut self, ticket: &FlightTicket) -> bool {
        if self.in_flight == Some(ticket.id) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    /// Replaces the memory and zeroes the counter.
    ///
    /// An outstanding request keeps the flight slot; its result will be
    /// discarded because the generation moved on.
    pub fn reset(&mut self) {
        self.question_counter = 0;
        self.generation += 1;
        self.memory = ConversationMemory::new(self.system_prompt.clone());
    }

    /// Frees the flight slot without waiting for the outstanding request.
    pub fn stop(&mut self) {
        self.in_flight = None;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_id_shape() {
        let id = new_message_id();
        assert_eq!(id.len(), MESSAGE_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(id, new_message_id());
    }

    #[test]
    fn test_single_flight() {
        let mut state = SessionState::new("sys");
        let ticket = state.begin_question().expect("first question accepted");
        assert!(state.in_progress());
        assert!(state.begin_question().is_none());
        assert_eq!(state.question_counter(), 1);

        assert!(state.finish(&ticket));
        assert!(!state.in_progress());
        assert!(state.begin_question().is_some());
        assert_eq!(state.question_counter(), 2);
    }

    #[test]
    fn test_reset_discards_in_flight_result() {
        let mut state = SessionState::new("sys");
        let ticket = state.begin_question().unwrap();

        state.reset();
        assert!(state.in_progress());
        assert_eq!(state.question_counter(), 0);

        assert!(!state.record_exchange(&ticket, "q", "a"));
        assert!(state.memory().is_fresh());
        assert!(state.finish(&ticket));
        assert!(!state.in_progress());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut state = SessionState::new("sys");
        let ticket = state.begin_question().unwrap();
        state.record_exchange(&ticket, "q", "a");
        state.finish(&ticket);

        state.reset();
        let once = (state.question_counter(), state.memory().len());
        state.reset();
        assert_eq!((state.question_counter(), state.memory().len()), once);
        assert_eq!(once, (0, 1));
    }

    #[test]
    fn test_stop_lets_new_question_in_and_ignores_old_finish() {
        let mut state = SessionState::new("sys");
        let old = state.begin_question().unwrap();
        state.stop();
        assert!(!state.in_progress());

        let new = state.begin_question().unwrap();
        assert!(!state.finish(&old));
        assert!(state.in_progress());
        assert!(!state.is_current(&old));
        assert!(state.is_current(&new));
    }
}
