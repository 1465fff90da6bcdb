/*!
 * Core Primitives
 *
 * Building blocks shared by the bridge:
 * - errors: closed error taxonomy for bridged calls
 * - limits: tuning constants
 * - sync: single-fire guard, write-once slot, rendezvous handle
 * - timeout: deadline tracking for the blocking wait
 */

pub mod errors;
pub mod limits;
pub mod sync;
pub mod timeout;

pub use errors::{BridgeError, BridgeResult, ErrorKind};
pub use timeout::Deadline;
