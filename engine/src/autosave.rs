//! Trailing-edge debounce for document writes.
//!
//! Time is passed in explicitly so the frame loop drives it with
//! `Instant::now()` and tests drive it with logical instants.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchedulerState {
    Idle,
    Pending { deadline: Instant },
    /// Torn down; no further writes are scheduled.
    Stopped,
}

#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    delay: Duration,
    state: SchedulerState,
}

impl AutosaveScheduler {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: SchedulerState::Idle,
        }
    }

    /// (Re)arm the timer: the write fires `delay` after the latest change.
    pub fn schedule(&mut self, now: Instant) {
        if self.state == SchedulerState::Stopped {
            return;
        }
        self.state = SchedulerState::Pending {
            deadline: now + self.delay,
        };
    }

    /// Consume the pending write if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.state {
            SchedulerState::Pending { deadline } if now >= deadline => {
                self.state = SchedulerState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Drop the pending write, if any.
    pub fn cancel(&mut self) {
        if matches!(self.state, SchedulerState::Pending { .. }) {
            self.state = SchedulerState::Idle;
        }
    }

    /// Cancel and refuse to schedule again.
    pub fn stop(&mut self) {
        self.state = SchedulerState::Stopped;
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            SchedulerState::Pending { deadline } => Some(deadline),
            SchedulerState::Idle | SchedulerState::Stopped => None,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline().is_some()
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.state == SchedulerState::Stopped
    }
}
