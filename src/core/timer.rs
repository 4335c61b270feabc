//! Timer reconciliation
//!
//! Consumer-side elapsed time and countdown for each job, derived from the
//! event stream. Every update measures the real delta since the last tick, so
//! missed or late ticks never undercount.

use crate::core::jobs::JobId;
use crate::core::reporter::BulkEvent;
use std::collections::HashMap;

const SECOND_MS: u64 = 1000;

/// Derived display state of one job
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerState {
    processing_seconds: u64,
    countdown_seconds: u64,
    is_processing: bool,
    is_paused: bool,
    last_tick: Option<u64>,
    countdown_tick: Option<u64>,
}

impl TimerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn processing_seconds(&self) -> u64 {
        self.processing_seconds
    }

    pub fn countdown_seconds(&self) -> u64 {
        self.countdown_seconds
    }

    /// Timestamp (ms) the elapsed accumulator last advanced to
    pub fn last_tick(&self) -> Option<u64> {
        self.last_tick
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    fn is_active(&self) -> bool {
        self.is_processing && !self.is_paused
    }

    /// Apply a processing/paused change observed at `now_ms`
    pub fn update_status(&mut self, is_processing: bool, is_paused: bool, now_ms: u64) {
        // Credit time spent in the previous state before switching
        self.tick(now_ms);

        self.is_processing = is_processing;
        self.is_paused = is_paused;

        if self.is_active() {
            self.last_tick.get_or_insert(now_ms);
            if self.countdown_seconds > 0 {
                self.countdown_tick.get_or_insert(now_ms);
            }
        } else {
            self.last_tick = None;
            self.countdown_tick = None;
            if !is_processing {
                self.countdown_seconds = 0;
            }
        }
    }

    /// Advance both counters by whole seconds elapsed since their last tick
    pub fn tick(&mut self, now_ms: u64) {
        if !self.is_active() {
            return;
        }

        if let Some((seconds, carry_from)) = whole_seconds(self.last_tick, now_ms) {
            self.processing_seconds += seconds;
            self.last_tick = Some(carry_from);
        }

        if let Some((seconds, carry_from)) = whole_seconds(self.countdown_tick, now_ms) {
            self.countdown_seconds = self.countdown_seconds.saturating_sub(seconds);
            self.countdown_tick = (self.countdown_seconds > 0).then_some(carry_from);
        }
    }

    /// Reset the countdown from an externally received value
    pub fn set_countdown(&mut self, seconds: u64, now_ms: u64) {
        self.tick(now_ms);
        self.countdown_seconds = seconds;
        self.countdown_tick = (seconds > 0 && self.is_active()).then_some(now_ms);
    }

    /// Elapsed processing time as `HH:MM:SS`
    pub fn elapsed_display(&self) -> String {
        format_clock(self.processing_seconds)
    }
}

/// Whole seconds since `last`, and the tick timestamp that keeps the remainder
fn whole_seconds(last: Option<u64>, now_ms: u64) -> Option<(u64, u64)> {
    let delta = now_ms.saturating_sub(last?);
    (delta >= SECOND_MS).then(|| (delta / SECOND_MS, now_ms - delta % SECOND_MS))
}

pub fn format_clock(total_seconds: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        total_seconds / 3600,
        (total_seconds / 60) % 60,
        total_seconds % 60
    )
}

/// Timer state for every job seen on an event stream
#[derive(Debug, Default)]
pub struct TimerReconciler {
    timers: HashMap<JobId, TimerState>,
}

impl TimerReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, job_id: &JobId) -> Option<&TimerState> {
        self.timers.get(job_id)
    }

    pub fn remove(&mut self, job_id: &JobId) -> Option<TimerState> {
        self.timers.remove(job_id)
    }

    /// Fold one event into its job's timer
    pub fn observe(&mut self, event: &BulkEvent, now_ms: u64) {
        let timer = self.timers.entry(event.job_id().clone()).or_default();

        match event {
            BulkEvent::RowProcessing { .. }
            | BulkEvent::RowComplete { .. }
            | BulkEvent::RowVerified { .. } => {
                if timer.is_processing() {
                    timer.tick(now_ms);
                } else {
                    timer.update_status(true, false, now_ms);
                }
            }
            BulkEvent::JobCountdown { seconds, .. } => {
                if !timer.is_processing() {
                    timer.update_status(true, false, now_ms);
                }
                timer.set_countdown(*seconds, now_ms);
            }
            BulkEvent::JobAutoPaused { .. } => timer.update_status(true, true, now_ms),
            BulkEvent::JobEnded { .. }
            | BulkEvent::JobComplete { .. }
            | BulkEvent::JobError { .. } => timer.update_status(false, false, now_ms),
        }
    }

    /// Operator pause/resume as seen by this consumer
    pub fn set_paused(&mut self, job_id: &JobId, paused: bool, now_ms: u64) {
        if let Some(timer) = self.timers.get_mut(job_id) {
            if timer.is_processing() {
                timer.update_status(true, paused, now_ms);
            }
        }
    }

    /// Periodic refresh of every timer
    pub fn tick_all(&mut self, now_ms: u64) {
        for timer in self.timers.values_mut() {
            timer.tick(now_ms);
        }
    }
}
