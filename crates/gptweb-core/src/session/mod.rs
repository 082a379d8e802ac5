//! Chat session state.
//!
//! [`SessionState`] is the single-flight guard, question counter and
//! conversation memory of one chat session. [`FlightTicket`] identifies an
//! outstanding remote request so late results can be recognized as stale.

mod state;

pub use state::{FlightTicket, MESSAGE_ID_LEN, SessionState, new_message_id};
