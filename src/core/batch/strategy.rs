//! Execution strategy contract

use super::batch_sync::BatchSynchronous;
use super::processor::RowProcessor;
use super::types::WorkItem;
use super::worker_pool::WorkerPool;
use crate::config::{PauseWait, StrategyKind};
use crate::core::delay::{DelayOutcome, interruptible_delay, wait_while_paused};
use crate::core::jobs::{Job, JobStatus};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Per-run settings and collaborators handed to a strategy
pub struct ExecutionContext {
    pub processor: Arc<RowProcessor>,
    /// Clamped to at least 1
    pub concurrency: usize,
    /// Between batches or between items, depending on the strategy
    pub delay: Duration,
    pub pause_wait: PauseWait,
    pub pause_poll_interval: Duration,
    pub cancel_poll_interval: Duration,
}

impl ExecutionContext {
    pub fn job(&self) -> &Arc<Job> {
        self.processor.job()
    }

    /// Block while paused; returns the status that ended the wait
    pub async fn wait_while_paused(&self) -> JobStatus {
        wait_while_paused(self.job(), self.pause_wait, self.pause_poll_interval).await
    }

    /// Run the configured delay, streaming countdown events; aborts on end
    pub async fn pace(&self) -> DelayOutcome {
        let reporter = self.processor.reporter();
        let job = self.job();
        interruptible_delay(
            self.delay,
            self.cancel_poll_interval,
            |seconds| reporter.countdown(seconds),
            || job.is_ended(),
        )
        .await
    }
}

/// A way of driving a job's rows through the processor
#[async_trait]
pub trait ExecutionStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Work the rows until done or the job is ended
    async fn execute(&self, ctx: &ExecutionContext, items: &[WorkItem]);
}

pub fn strategy_for(kind: StrategyKind) -> Box<dyn ExecutionStrategy> {
    match kind {
        StrategyKind::Batch => Box::new(BatchSynchronous),
        StrategyKind::WorkerPool => Box::new(WorkerPool),
    }
}
