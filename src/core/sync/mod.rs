/*!
 * Synchronization Primitives
 *
 * The three pieces of state behind one pending bridged call:
 * - `CompletionGuard`: single-fire election (atomic state cell)
 * - `PendingResult`: write-once result slot
 * - `WaitHandle`: one-shot rendezvous the caller blocks on
 *
 * # Ordering
 *
 * The completion path arms the guard (AcqRel CAS), writes the slot, then
 * signals the handle. The waiter observes the signal, reads the guard, then
 * takes the slot. Slot and handle are mutex-protected, so by the time the
 * waiter sees the signal the written value is visible.
 */

mod config;
mod guard;
mod handle;
mod slot;

pub use config::{StrategyType, WaitConfig};
pub use guard::{CompletionGuard, GuardState};
pub use handle::WaitHandle;
pub use slot::PendingResult;
