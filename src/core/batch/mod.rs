//! Bulk execution
//!
//! Turns a row source into numbered work items and runs them against the
//! remote under one of two interchangeable strategies.

mod batch_sync;
mod processor;
mod resume;
mod strategy;
mod types;
mod worker_pool;


pub use batch_sync::BatchSynchronous;
pub use processor::{RowOutcome, RowProcessor};
pub use resume::ResumeFilter;
pub use strategy::{ExecutionContext, ExecutionStrategy, strategy_for};
pub use types::{RowSource, StartJobRequest, WorkItem, build_work_items};
pub use worker_pool::WorkerPool;
