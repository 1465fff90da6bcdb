/*!
 * Wait Configuration
 *
 * Runtime selection of how the calling thread waits for a completion
 */

use crate::core::limits::{
    DEFAULT_MAX_SPINS, DEFAULT_SPIN_DURATION, LOW_LATENCY_MAX_SPINS, LOW_LATENCY_SPIN_DURATION,
};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMicroSeconds};
use std::time::Duration;

/// Strategy type selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyType {
    /// Park on a condvar immediately
    Condvar,
    /// Spin with backoff for a short window, then park
    SpinWait,
    /// Pick based on configuration
    Auto,
}

/// Wait configuration
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    /// Preferred strategy
    pub strategy: StrategyType,
    /// Spin duration before parking (for SpinWait)
    #[serde_as(as = "DurationMicroSeconds<u64>")]
    pub spin_duration: Duration,
    /// Maximum spin iterations before parking
    pub max_spins: u32,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyType::Auto,
            spin_duration: DEFAULT_SPIN_DURATION,
            max_spins: DEFAULT_MAX_SPINS,
        }
    }
}

impl WaitConfig {
    /// Configuration for completions expected within a millisecond
    pub const fn low_latency() -> Self {
        Self {
            strategy: StrategyType::SpinWait,
            spin_duration: LOW_LATENCY_SPIN_DURATION,
            max_spins: LOW_LATENCY_MAX_SPINS,
        }
    }

    /// Configuration for completions expected to take a while
    pub const fn long_wait() -> Self {
        Self {
            strategy: StrategyType::Condvar,
            spin_duration: Duration::ZERO,
            max_spins: 0,
        }
    }

    /// Resolve `Auto` into a concrete strategy
    pub fn select_strategy(&self) -> StrategyType {
        match self.strategy {
            // Bridged operations usually take longer than a spin window
            StrategyType::Auto => StrategyType::Condvar,
            other => other,
        }
    }
}
