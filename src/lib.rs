/*!
 * Sync Bridge Library
 * Blocking execution of callback-completed and async operations
 *
 * Turns "do some work and call me back" into a plain function call that
 * returns the callback's value, with an optional timeout and strict
 * single-completion enforcement.
 */

#![warn(clippy::all)]

pub mod bridge;
pub mod core;
pub mod monitoring;

// Re-exports
pub use crate::bridge::{
    BridgeConfig, Completion, Fire, ProtocolViolation, Spawn, SyncBridge, ThreadSpawner,
    ViolationPolicy,
};
pub use crate::core::errors::{Abandoned, BridgeError, BridgeResult, ErrorKind, TimedOut};
pub use crate::core::sync::{StrategyType, WaitConfig};
pub use crate::monitoring::{init_tracing, BridgeMetrics, BridgeObserver, MetricsSnapshot};
