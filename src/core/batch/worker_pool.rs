//! Worker-pool strategy

use super::processor::RowOutcome;
use super::strategy::{ExecutionContext, ExecutionStrategy};
use super::types::WorkItem;
use crate::config::StrategyKind;
use crate::core::delay::DelayOutcome;
use crate::core::jobs::JobStatus;
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// `concurrency` long-lived workers claiming rows from a shared cursor,
/// each pacing itself with the per-item delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool;

#[async_trait]
impl ExecutionStrategy for WorkerPool {
    fn kind(&self) -> StrategyKind {
        StrategyKind::WorkerPool
    }

    async fn execute(&self, ctx: &ExecutionContext, items: &[WorkItem]) {
        let job = ctx.job();
        let cursor = AtomicUsize::new(0);
        let cursor = &cursor;
        let workers = ctx.concurrency.max(1).min(items.len());

        let pool = (0..workers).map(|worker| async move {
            loop {
                if ctx.wait_while_paused().await == JobStatus::Ended {
                    break;
                }

                let index = cursor.fetch_add(1, Ordering::SeqCst);
                let Some(item) = items.get(index) else {
                    break;
                };

                if ctx.processor.process(item).await == RowOutcome::Skipped {
                    continue;
                }

                // Nothing left to claim, so there is nothing to pace for
                if cursor.load(Ordering::SeqCst) >= items.len() {
                    break;
                }
                if !ctx.delay.is_zero() && ctx.pace().await == DelayOutcome::Cancelled {
                    break;
                }
            }
            debug!("Job {} worker {} stopped", job.id(), worker);
        });
        join_all(pool).await;

        info!("Job {} worker pool finished", job.id());
    }
}
