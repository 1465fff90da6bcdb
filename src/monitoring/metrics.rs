/*!
 * Bridge Metrics
 *
 * Observer hooks for bridged call outcomes plus a lock-free counter
 * implementation.
 */

use crate::bridge::ProtocolViolation;
use crate::core::errors::ErrorKind;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Receives bridged call outcomes
///
/// All methods default to no-ops so implementors only override what they
/// care about. Methods may be called from any thread; violations in
/// particular are reported from whichever thread fired the completion.
pub trait BridgeObserver: Send + Sync {
    /// A call returned its value
    fn on_success(&self, name: &str, elapsed: Duration) {
        let _ = (name, elapsed);
    }

    /// A call returned an error
    fn on_error(&self, name: &str, kind: ErrorKind, elapsed: Duration) {
        let _ = (name, kind, elapsed);
    }

    /// A completion fired after another one had already been accepted
    fn on_violation(&self, violation: &ProtocolViolation) {
        let _ = violation;
    }
}

/// Point-in-time copy of [`BridgeMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub calls: u64,
    pub successes: u64,
    pub start_failures: u64,
    pub failures: u64,
    pub timeouts: u64,
    pub abandoned: u64,
    pub violations: u64,
    pub total_wait_us: u64,
}

impl MetricsSnapshot {
    /// Total calls that ended in an error
    pub fn errors(&self) -> u64 {
        self.start_failures + self.failures + self.timeouts + self.abandoned
    }

    /// Average time spent per call in microseconds
    pub fn average_wait_us(&self) -> u64 {
        if self.calls == 0 {
            0
        } else {
            self.total_wait_us / self.calls
        }
    }
}

/// Atomic counters implementing [`BridgeObserver`]
#[derive(Debug, Default)]
pub struct BridgeMetrics {
    calls: AtomicU64,
    successes: AtomicU64,
    start_failures: AtomicU64,
    failures: AtomicU64,
    timeouts: AtomicU64,
    abandoned: AtomicU64,
    violations: AtomicU64,
    total_wait_us: AtomicU64,
}

impl BridgeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the current counter values
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            calls: self.calls.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            start_failures: self.start_failures.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            abandoned: self.abandoned.load(Ordering::Relaxed),
            violations: self.violations.load(Ordering::Relaxed),
            total_wait_us: self.total_wait_us.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        for counter in [
            &self.calls,
            &self.successes,
            &self.start_failures,
            &self.failures,
            &self.timeouts,
            &self.abandoned,
            &self.violations,
            &self.total_wait_us,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    #[inline]
    fn record_call(&self, elapsed: Duration) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.total_wait_us
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }
}

impl BridgeObserver for BridgeMetrics {
    fn on_success(&self, _name: &str, elapsed: Duration) {
        self.record_call(elapsed);
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    fn on_error(&self, _name: &str, kind: ErrorKind, elapsed: Duration) {
        self.record_call(elapsed);
        let counter = match kind {
            ErrorKind::Start => &self.start_failures,
            ErrorKind::Failed => &self.failures,
            ErrorKind::TimedOut => &self.timeouts,
            ErrorKind::Abandoned => &self.abandoned,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn on_violation(&self, _violation: &ProtocolViolation) {
        self.violations.fetch_add(1, Ordering::Relaxed);
    }
}
