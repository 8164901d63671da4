//! Search debounce as discrete token events.
//!
//! Every keystroke arms a new token. The runtime sleeps for the quiet period
//! and then reports the token back; only the most recently armed token is
//! allowed to commit.

use std::time::Duration;

/// Default quiet period before a search term is committed.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    delay: Duration,
    latest: u64,
    pending: bool,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}

impl Debouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay, latest: 0, pending: false }
    }

    /// Arms a new token, superseding any pending one.
    pub fn arm(&mut self) -> u64 {
        self.latest += 1;
        self.pending = true;
        self.latest
    }

    /// Consumes `token` if it is the latest pending one.
    pub fn fire(&mut self, token: u64) -> bool {
        if self.pending && token == self.latest {
            self.pending = false;
            true
        } else {
            false
        }
    }

    /// Drops the pending token so its timer has no effect.
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }
}
