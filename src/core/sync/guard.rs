/*!
 * Completion Guard
 *
 * Single-use latch electing the one completion that counts. Transitions
 * exactly once out of `Unarmed`; every later attempt observes the armed
 * state and is rejected.
 */

use std::sync::atomic::{AtomicU8, Ordering};

const UNARMED: u8 = 0;
const COMPLETED: u8 = 1;
const ABANDONED: u8 = 2;

/// Observable state of a [`CompletionGuard`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Nothing has fired yet
    Unarmed,
    /// A completion won the election and stored its value
    Completed,
    /// Every completion handle was dropped without firing
    Abandoned,
}

impl GuardState {
    #[inline(always)]
    fn from_raw(raw: u8) -> Self {
        match raw {
            UNARMED => Self::Unarmed,
            COMPLETED => Self::Completed,
            _ => Self::Abandoned,
        }
    }
}

/// Single-fire election cell
#[derive(Debug)]
pub struct CompletionGuard {
    state: AtomicU8,
}

impl CompletionGuard {
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(UNARMED),
        }
    }

    /// Arm as completed
    ///
    /// Returns `Err` with the state that was already armed if another caller
    /// won first.
    #[inline]
    pub fn try_complete(&self) -> Result<(), GuardState> {
        self.try_arm(COMPLETED)
    }

    /// Arm as abandoned
    #[inline]
    pub fn try_abandon(&self) -> Result<(), GuardState> {
        self.try_arm(ABANDONED)
    }

    #[inline(always)]
    fn try_arm(&self, target: u8) -> Result<(), GuardState> {
        self.state
            .compare_exchange(UNARMED, target, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(GuardState::from_raw)
    }

    /// Current state
    #[inline]
    pub fn state(&self) -> GuardState {
        GuardState::from_raw(self.state.load(Ordering::Acquire))
    }

    /// Check if the guard left the unarmed state
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.state() != GuardState::Unarmed
    }
}

impl Default for CompletionGuard {
    fn default() -> Self {
        Self::new()
    }
}
