//! Interruptible delay and pause waiting
//!
//! Used between batches and between items. Callers supply the tick sink and
//! the cancellation predicate; everything else is shared.

use crate::config::PauseWait;
use crate::core::jobs::{Job, JobStatus};
use std::time::Duration;
use tokio::time::{Instant, sleep, sleep_until};

const TICK: Duration = Duration::from_secs(1);

/// How a delay finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayOutcome {
    Completed,
    Cancelled,
}

/// Whole seconds left, rounded up
pub fn seconds_remaining(remaining: Duration) -> u64 {
    remaining.as_millis().div_ceil(1000) as u64
}

/// Sleep for `duration`, reporting remaining seconds once per second.
///
/// `is_cancelled` is checked at least every `cancel_poll`; when it turns true
/// the delay resolves immediately. Both exits emit a final tick of 0.
pub async fn interruptible_delay<T, C>(
    duration: Duration,
    cancel_poll: Duration,
    mut on_tick: T,
    is_cancelled: C,
) -> DelayOutcome
where
    T: FnMut(u64),
    C: Fn() -> bool,
{
    let cancel_poll = cancel_poll.max(Duration::from_millis(1));
    let deadline = Instant::now() + duration;
    let mut next_tick = Instant::now();

    loop {
        if is_cancelled() {
            on_tick(0);
            return DelayOutcome::Cancelled;
        }

        let now = Instant::now();
        if now >= deadline {
            break;
        }

        if now >= next_tick {
            on_tick(seconds_remaining(deadline - now));
            next_tick += TICK;
        }

        let wake = deadline.min(next_tick).min(now + cancel_poll);
        sleep_until(wake).await;
    }

    on_tick(0);
    DelayOutcome::Completed
}

/// Block while the job is paused. Returns the status that ended the wait.
pub async fn wait_while_paused(job: &Job, mode: PauseWait, poll_interval: Duration) -> JobStatus {
    match mode {
        PauseWait::Poll => {
            while job.is_paused() {
                sleep(poll_interval).await;
            }
            job.status()
        }
        PauseWait::Notify => {
            let mut status = job.subscribe();
            match status.wait_for(|s| *s != JobStatus::Paused).await {
                Ok(current) => *current,
                // Sender lives as long as the job; fall back to a direct read
                Err(_) => job.status(),
            }
        }
    }
}
