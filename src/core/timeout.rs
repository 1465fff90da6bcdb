/*!
 * Deadline Tracking
 *
 * A bridged call has at most one timeout, fixed when the call starts. The
 * deadline is computed once and every wait phase (spin, park) measures
 * against the same instant, so a wait that wakes spuriously never extends
 * the caller's total budget.
 */

use std::time::{Duration, Instant};

/// Deadline for a single blocking wait
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    limit: Option<Duration>,
    at: Option<Instant>,
}

impl Deadline {
    /// Start a deadline now. `None` means wait indefinitely.
    pub fn new(limit: Option<Duration>) -> Self {
        let start = Instant::now();
        // Durations too large to represent as an instant behave as unbounded
        let at = limit.and_then(|d| start.checked_add(d));
        Self { start, limit, at }
    }

    /// Deadline that never expires
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// Configured limit
    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }

    /// Instant at which the wait gives up (None = never)
    pub fn instant(&self) -> Option<Instant> {
        self.at
    }

    /// Time since the deadline started
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Check if the deadline has passed
    pub fn is_expired(&self) -> bool {
        match self.at {
            None => false,
            Some(at) => Instant::now() >= at,
        }
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::unbounded()
    }
}
