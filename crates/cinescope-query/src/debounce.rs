//! Cancellable debounce timer.
//!
//! The timer never sleeps on its own. Callers pass the current instant to
//! `arm` and `fire_if_due`, so tests advance logical time and async drivers
//! sleep until [`Debouncer::deadline`].

use std::time::Duration;

use tokio::time::Instant;

/// Debounce delay applied to search input.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// A single scheduled task that can be re-armed or cancelled.
#[derive(Debug, Clone)]
pub struct Debouncer {
    /// Quiet period required before firing.
    delay: Duration,
    /// When the armed task fires.
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Creates a disarmed debouncer.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Returns the configured delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Arms (or re-arms) the task to fire `delay` after `now`.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Cancels the armed task, if any.
    pub const fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns the armed deadline.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether a task is armed.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Fires the task if its deadline has passed; a fired task is disarmed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}
