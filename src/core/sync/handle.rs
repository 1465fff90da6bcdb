/*!
 * Wait Handle
 *
 * One-shot rendezvous between the completion path (signals once) and the
 * calling thread (waits once, optionally with a deadline).
 *
 * # Strategies
 *
 * - **Condvar**: park on a `parking_lot::Condvar` right away
 * - **SpinWait**: three-phase backoff (spin hint → yield → short sleeps)
 *   for a bounded window, then park on the condvar
 *
 * The signaled flag is set while holding the mutex, so a waiter that checks
 * the flag under the same mutex cannot miss the wakeup. Spurious wakeups are
 * absorbed by re-checking the flag against the deadline.
 */

use super::config::{StrategyType, WaitConfig};
use crate::core::limits::{MAX_BACKOFF_SLEEP, SPIN_PHASE_ITERATIONS, YIELD_PHASE_ITERATIONS};
use crate::core::timeout::Deadline;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// One-shot rendezvous for a single waiter
pub struct WaitHandle {
    signaled: AtomicBool,
    mutex: Mutex<()>,
    condvar: Condvar,
    strategy: StrategyType,
    spin_duration: Duration,
    max_spins: u32,
}

impl WaitHandle {
    /// Create a handle using the given wait configuration
    pub fn new(config: &WaitConfig) -> Self {
        Self {
            signaled: AtomicBool::new(false),
            mutex: Mutex::new(()),
            condvar: Condvar::new(),
            strategy: config.select_strategy(),
            spin_duration: config.spin_duration,
            max_spins: config.max_spins,
        }
    }

    /// Create a condvar-backed handle
    pub fn with_defaults() -> Self {
        Self::new(&WaitConfig::default())
    }

    /// Signal the waiter
    ///
    /// Returns `false` if the handle was already signaled.
    pub fn signal(&self) -> bool {
        let _guard = self.mutex.lock();
        if self.signaled.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.condvar.notify_all();
        true
    }

    /// Check if the handle has been signaled
    #[inline]
    pub fn is_signaled(&self) -> bool {
        self.signaled.load(Ordering::Acquire)
    }

    /// Block until signaled or until `deadline` passes
    ///
    /// Returns `true` if signaled, `false` on timeout.
    pub fn wait(&self, deadline: &Deadline) -> bool {
        if self.is_signaled() {
            return true;
        }

        if self.strategy == StrategyType::SpinWait && self.spin(deadline) {
            return true;
        }

        self.park(deadline.instant())
    }

    /// Park on the condvar until signaled or the deadline passes
    fn park(&self, deadline: Option<Instant>) -> bool {
        let mut guard = self.mutex.lock();

        while !self.signaled.load(Ordering::Acquire) {
            match deadline {
                Some(at) => {
                    if self.condvar.wait_until(&mut guard, at).timed_out() {
                        // A signal racing the deadline still counts
                        return self.signaled.load(Ordering::Acquire);
                    }
                }
                None => self.condvar.wait(&mut guard),
            }
        }

        true
    }

    /// Adaptive spinning with exponential backoff
    ///
    /// Returns true if signaled during the spin window.
    fn spin(&self, deadline: &Deadline) -> bool {
        let start = Instant::now();
        let mut spin_count = 0u32;
        let mut backoff = Duration::from_nanos(1);

        loop {
            if self.is_signaled() {
                return true;
            }

            if start.elapsed() >= self.spin_duration || spin_count >= self.max_spins {
                return false;
            }

            if deadline.is_expired() {
                return false;
            }

            if spin_count < SPIN_PHASE_ITERATIONS {
                std::hint::spin_loop();
            } else if spin_count < YIELD_PHASE_ITERATIONS {
                thread::yield_now();
            } else {
                thread::sleep(backoff);
                backoff = (backoff * 2).min(MAX_BACKOFF_SLEEP);
            }

            spin_count += 1;
        }
    }

    /// Get strategy name for debugging
    pub fn strategy_name(&self) -> &'static str {
        match self.strategy {
            StrategyType::SpinWait => "spinwait",
            StrategyType::Condvar | StrategyType::Auto => "condvar",
        }
    }
}

impl Default for WaitHandle {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for WaitHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitHandle")
            .field("signaled", &self.is_signaled())
            .field("strategy", &self.strategy_name())
            .finish()
    }
}
