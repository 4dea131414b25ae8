//! Cancellable deferred task driven by an external clock.
//!
//! There is no background timer: the owner polls with the current instant
//! and receives the payload once the quiet period has elapsed. Dropping or
//! cancelling the task leaves nothing behind to fire later.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct DeferredTask<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> DeferredTask<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Replace any pending payload and restart the quiet period from `now`.
    pub fn schedule(&mut self, payload: T, now: Instant) {
        self.pending = Some((now + self.delay, payload));
    }

    /// Drop the pending payload. Safe to call any number of times.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(due, _)| due.saturating_duration_since(now))
    }

    /// Take the payload if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((due, _)) if now >= *due => self.pending.take().map(|(_, payload)| payload),
            _ => None,
        }
    }
}
