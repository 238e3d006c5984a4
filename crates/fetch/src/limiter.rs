//! Request spacing shared by every fetcher of a build.
//!
//! The rate limit belongs to the remote endpoint, not to any single fetch,
//! so all workers go through the same limiter. Each request waits until the
//! required gap since the *previous request from anyone* has elapsed:
//! - [`RequestKind::FirstPage`]: first request for a title (`page_delay`)
//! - [`RequestKind::Continuation`]: a follow-up round (`round_delay`)
//!
//! Run sequentially this reproduces "100ms between rounds, 500ms between
//! pages"; run concurrently the same spacing holds globally.

use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Which kind of request is about to be issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// First request for a page title.
    FirstPage,
    /// Request carrying a continuation token.
    Continuation,
}

/// Mutex-guarded timestamp of the last outbound request.
#[derive(Debug)]
pub struct RateLimiter {
    round_delay: Duration,
    page_delay: Duration,
    last: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter with the given spacings.
    pub fn new(round_delay: Duration, page_delay: Duration) -> Self {
        Self {
            round_delay,
            page_delay,
            last: Mutex::new(None),
        }
    }

    /// A limiter that never waits.
    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Required gap before a request of `kind`.
    pub fn spacing(&self, kind: RequestKind) -> Duration {
        match kind {
            RequestKind::FirstPage => self.page_delay,
            RequestKind::Continuation => self.round_delay,
        }
    }

    /// Block until a request of `kind` may be sent, then claim the slot.
    ///
    /// The lock is held while sleeping so waiters are admitted one at a time,
    /// each measuring its gap from the previous admission. Returns how long
    /// the caller waited.
    pub fn acquire(&self, kind: RequestKind) -> Duration {
        let gap = self.spacing(kind);
        let mut last = self.last.lock();
        let mut waited = Duration::ZERO;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < gap {
                waited = gap - elapsed;
                thread::sleep(waited);
            }
        }
        *last = Some(Instant::now());
        waited
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_millis(100), Duration::from_millis(500))
    }
}
