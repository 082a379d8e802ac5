//! Telemetry event model.
//!
//! - `kind`: the closed [`EventKind`] taxonomy
//! - `record`: [`EventRecord`] and its per-variant details
//! - `clock`: [`EventClock`], the non-decreasing timestamp source

mod clock;
mod kind;
mod record;

pub use clock::EventClock;
pub use kind::EventKind;
pub use record::{
    ChangeReason, DocumentMeta, EventDetail, EventRecord, LINE_TERMINATOR, SelectionKind,
    UserPayload,
};
