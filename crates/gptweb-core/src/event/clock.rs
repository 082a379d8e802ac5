use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Wall-clock millisecond source that never goes backwards.
///
/// If the system clock is stepped back, the last issued value is repeated
/// until real time catches up.
#[derive(Debug, Default)]
pub struct EventClock {
    last: AtomicI64,
}

impl EventClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current unix time in milliseconds, clamped to be >= every earlier result.
    pub fn now_millis(&self) -> i64 {
        self.observe(Utc::now().timestamp_millis())
    }

    fn observe(&self, wall: i64) -> i64 {
        let previous = self.last.fetch_max(wall, Ordering::SeqCst);
        previous.max(wall)
    }
}
