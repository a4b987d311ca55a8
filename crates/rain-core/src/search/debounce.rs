//! Settle-window debouncing for search input.
//!
//! Time is passed in by the caller so the behaviour is deterministic; a UI
//! loop feeds `Instant::now()`, tests feed synthetic instants.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a new value; restarts the settle window.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Take the latest value once the window has elapsed since the last push.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let settled = self
            .pending
            .as_ref()
            .is_some_and(|(_, at)| now.saturating_duration_since(*at) >= self.window);
        if settled {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// Time left until the pending value settles
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, at)| self.window.saturating_sub(now.saturating_duration_since(*at)))
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
