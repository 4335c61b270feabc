//! Batch-synchronous strategy

use super::strategy::{ExecutionContext, ExecutionStrategy};
use super::types::WorkItem;
use crate::config::StrategyKind;
use crate::core::delay::DelayOutcome;
use crate::core::jobs::JobStatus;
use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, info};

/// Contiguous batches of `concurrency` rows; each batch runs fully
/// concurrently and is awaited before the delay and the next batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchSynchronous;

#[async_trait]
impl ExecutionStrategy for BatchSynchronous {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Batch
    }

    async fn execute(&self, ctx: &ExecutionContext, items: &[WorkItem]) {
        let job = ctx.job();
        let total_batches = items.len().div_ceil(ctx.concurrency.max(1));

        for (index, batch) in items.chunks(ctx.concurrency.max(1)).enumerate() {
            if job.is_ended() {
                break;
            }
            if ctx.wait_while_paused().await == JobStatus::Ended {
                break;
            }

            if index > 0 && !ctx.delay.is_zero() {
                if ctx.pace().await == DelayOutcome::Cancelled {
                    break;
                }
                // Honor a pause requested during the delay
                if ctx.wait_while_paused().await == JobStatus::Ended {
                    break;
                }
            }
            if job.is_ended() {
                break;
            }

            debug!(
                "Job {} starting batch {}/{} ({} rows)",
                job.id(),
                index + 1,
                total_batches,
                batch.len()
            );
            join_all(batch.iter().map(|item| ctx.processor.process(item))).await;
        }

        info!("Job {} batch loop finished", job.id());
    }
}
