//! Delayed, supersede-on-repeat scheduling.
//!
//! [`Debouncer`] holds at most one pending value with a deadline. Scheduling
//! again replaces the pending value and restarts the delay. It owns no timer:
//! callers pass the current [`Instant`] and poll, which keeps it usable from
//! an async runtime, a UI loop or a test.

use std::time::{Duration, Instant};

/// A single pending value that fires `delay` after it was last scheduled.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    due: Instant,
    value: T,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value` to fire at `now + delay`.
    ///
    /// Returns the value that was superseded, if one was pending.
    pub fn schedule(&mut self, now: Instant, value: T) -> Option<T> {
        let due = now + self.delay;
        self.pending
            .replace(Pending { due, value })
            .map(|superseded| superseded.value)
    }

    /// Take the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.as_ref().is_some_and(|p| p.due <= now) {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }

    /// Drop the pending value without firing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// The pending value, if any, regardless of its deadline.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.value)
    }

    /// When the pending value fires.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left before the pending value fires, zero if already due.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline().map(|due| due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(250);

    #[test]
    fn test_fires_after_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        assert!(debouncer.schedule(start, "shoe").is_none());

        assert_eq!(debouncer.poll(start + Duration::from_millis(249)), None);
        assert_eq!(debouncer.poll(start + DELAY), Some("shoe"));
        assert_eq!(debouncer.poll(start + DELAY * 2), None);
    }

    #[test]
    fn test_reschedule_supersedes_and_restarts() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule(start, "s");
        let superseded = debouncer.schedule(start + Duration::from_millis(200), "sh");
        assert_eq!(superseded, Some("s"));

        // The first deadline has passed but was pushed out by the second call.
        assert_eq!(debouncer.poll(start + Duration::from_millis(300)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(450)), Some("sh"));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule(start, 1);
        assert_eq!(debouncer.cancel(), Some(1));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + DELAY), None);
    }

    #[test]
    fn test_remaining() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        assert_eq!(debouncer.remaining(start), None);
        debouncer.schedule(start, ());
        assert_eq!(
            debouncer.remaining(start + Duration::from_millis(100)),
            Some(Duration::from_millis(150))
        );
        assert_eq!(debouncer.remaining(start + DELAY * 4), Some(Duration::ZERO));
    }
}
