/*!
 * Monitoring
 *
 * Structured tracing setup and per-call outcome metrics for bridged calls.
 */

mod metrics;
mod tracer;

pub use metrics::{BridgeMetrics, BridgeObserver, MetricsSnapshot};
pub use tracer::{call_span, generate_call_id, init_tracing};
