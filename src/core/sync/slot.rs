/*!
 * Pending Result Slot
 *
 * Write-once holder for a completion's value. Only the first write is
 * stored; the value can be taken exactly once.
 */

use parking_lot::Mutex;

enum SlotState<T> {
    Empty,
    Filled(T),
    Taken,
}

/// Write-once, take-once result slot
pub struct PendingResult<T> {
    state: Mutex<SlotState<T>>,
}

impl<T> PendingResult<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState::Empty),
        }
    }

    /// Store a value
    ///
    /// Returns the value back if the slot was already written.
    pub fn put(&self, value: T) -> Result<(), T> {
        let mut state = self.state.lock();
        match *state {
            SlotState::Empty => {
                *state = SlotState::Filled(value);
                Ok(())
            }
            SlotState::Filled(_) | SlotState::Taken => Err(value),
        }
    }

    /// Take the stored value, leaving the slot consumed
    pub fn take(&self) -> Option<T> {
        let mut state = self.state.lock();
        match std::mem::replace(&mut *state, SlotState::Taken) {
            SlotState::Filled(value) => Some(value),
            SlotState::Empty => {
                *state = SlotState::Empty;
                None
            }
            SlotState::Taken => None,
        }
    }

    /// Check if a value was ever written
    pub fn is_written(&self) -> bool {
        !matches!(*self.state.lock(), SlotState::Empty)
    }
}

impl<T> Default for PendingResult<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for PendingResult<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match *self.state.lock() {
            SlotState::Empty => "empty",
            SlotState::Filled(_) => "filled",
            SlotState::Taken => "taken",
        };
        f.debug_struct("PendingResult").field("state", &state).finish()
    }
}
