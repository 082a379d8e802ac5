//! Telemetry sink abstraction.

use crate::error::Result;
use crate::event::EventRecord;

/// Append-only destination for [`EventRecord`]s.
///
/// Each `append` must complete its write before returning so that records
/// land in the order the calls were made.
pub trait EventSink: Send + Sync {
    /// Serializes and appends one record.
    ///
    /// # Errors
    ///
    /// Returns `WriteFailed` if the underlying storage rejects the write.
    fn append(&self, record: &EventRecord) -> Result<()>;
}
