//! Result reporting
//!
//! Structured lifecycle events streamed to an external sink. Delivery is
//! best-effort and never fails the caller.

mod events;
mod reporter;
mod sink;

pub use events::{BulkEvent, JobSummary, RowResult};
pub use reporter::{JobStats, ResultReporter};
pub use sink::{ChannelSink, EventSink, MemorySink};
