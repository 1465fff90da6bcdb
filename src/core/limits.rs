/*!
 * Bridge Limits and Tuning Constants
 *
 * Every magic number used by the bridge lives here so the wait strategies
 * and their tests agree on the same values.
 */

use std::time::Duration;

// ============================================================================
// LABELS
// ============================================================================

/// Label used in diagnostics when a bridge has no name
pub const DEFAULT_OPERATION_LABEL: &str = "Async-to-sync operation";

// ============================================================================
// SPIN-WAIT TUNING
// ============================================================================

/// Iterations spent on `spin_loop()` hints before yielding
pub const SPIN_PHASE_ITERATIONS: u32 = 10;

/// Iterations spent yielding before sleeping with backoff
pub const YIELD_PHASE_ITERATIONS: u32 = 50;

/// Upper bound for a single backoff sleep
pub const MAX_BACKOFF_SLEEP: Duration = Duration::from_millis(1);

/// Default spin window before parking
pub const DEFAULT_SPIN_DURATION: Duration = Duration::from_micros(10);

/// Default spin iteration cap before parking
pub const DEFAULT_MAX_SPINS: u32 = 100;

/// Spin window for callers expecting sub-millisecond completions
pub const LOW_LATENCY_SPIN_DURATION: Duration = Duration::from_micros(50);

/// Spin iteration cap for callers expecting sub-millisecond completions
pub const LOW_LATENCY_MAX_SPINS: u32 = 500;

// ============================================================================
// ENVIRONMENT
// ============================================================================

/// Timeout override in milliseconds (`0` disables the timeout)
pub const ENV_TIMEOUT_MS: &str = "SYNC_BRIDGE_TIMEOUT_MS";

/// Name override for diagnostics
pub const ENV_NAME: &str = "SYNC_BRIDGE_NAME";

/// Protocol violation policy override (`ignore`, `log`, `assert`)
pub const ENV_ON_VIOLATION: &str = "SYNC_BRIDGE_ON_VIOLATION";

/// Enables JSON trace output when set to `1` or `true`
pub const ENV_TRACE_JSON: &str = "SYNC_BRIDGE_TRACE_JSON";
