//! Injectable monotonic time and timer deadlines

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of monotonic timestamps
///
/// Timestamps are offsets from an arbitrary origin; only differences matter.
/// Hosts must stamp raw events with the same clock they hand to the
/// pipeline.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually driven clock for tests and replays
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the pipeline.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to an absolute time
    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Identity of one recognizer session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// An armed timer belonging to a specific session
///
/// Delivering a deadline whose session has ended is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    pub session: SessionId,
    pub at: Duration,
}

impl Deadline {
    /// Returns true once `now` has reached the deadline
    pub fn is_due(&self, now: Duration) -> bool {
        now >= self.at
    }
}
