//! Self-clearing notice channel.
//!
//! The most recent notice stays visible for a fixed time-to-live. Posting a
//! new notice replaces the current one and restarts the clock. The page
//! re-fetches `/notice` once the TTL has elapsed and gets an empty slot back.

use std::time::{Duration, Instant};

use asn_store_core::{Debouncer, Notice};

/// Holds the notice currently on screen.
#[derive(Debug)]
pub struct NoticeBoard {
    slot: Debouncer<Notice>,
}

impl NoticeBoard {
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self {
            slot: Debouncer::new(ttl),
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.slot.delay()
    }

    /// Show `notice`, replacing whatever was showing.
    pub fn post(&mut self, now: Instant, notice: Notice) {
        if let Some(previous) = self.slot.schedule(now, notice) {
            tracing::trace!(message = %previous.message, "notice superseded");
        }
    }

    /// The notice still showing at `now`, clearing it once expired.
    pub fn current(&mut self, now: Instant) -> Option<Notice> {
        if let Some(expired) = self.slot.poll(now) {
            tracing::trace!(message = %expired.message, "notice expired");
            return None;
        }
        self.slot.peek().cloned()
    }

    /// Time until the current notice clears.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.slot.remaining(now)
    }
}
