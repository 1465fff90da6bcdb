/*!
 * Synchronous Bridge
 *
 * Blocking execution of operations that complete through a callback:
 * - config: name, timeout, violation policy, wait strategy
 * - executor: `SyncBridge` and its call shapes
 * - pending: per-call shared state and the `Completion` handle
 * - spawn: executors for the async call shapes
 * - violation: handling of completions that fire more than once
 */

mod config;
mod executor;
mod pending;
mod spawn;
mod violation;

pub use config::BridgeConfig;
pub use executor::SyncBridge;
pub use pending::{Completion, Fire};
pub use spawn::{Spawn, ThreadSpawner};
pub use violation::{ProtocolViolation, ViolationPolicy};
