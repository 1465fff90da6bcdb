/*!
 * Bridge Configuration
 *
 * Name, timeout, violation policy and wait strategy for a [`SyncBridge`].
 *
 * [`SyncBridge`]: super::SyncBridge
 */

use super::violation::ViolationPolicy;
use crate::core::limits::{DEFAULT_OPERATION_LABEL, ENV_NAME, ENV_ON_VIOLATION, ENV_TIMEOUT_MS};
use crate::core::sync::WaitConfig;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::time::Duration;
use tracing::warn;

/// Configuration for bridged calls
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Label used in diagnostics and timeout errors
    pub name: Option<String>,

    /// Maximum time to block (None = wait indefinitely)
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    pub timeout: Option<Duration>,

    /// Handling of completions that fire more than once
    pub on_violation: ViolationPolicy,

    /// How the calling thread waits
    pub wait: WaitConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeConfig {
    /// Unnamed, untimed configuration asserting on violations
    pub fn new() -> Self {
        Self {
            name: None,
            timeout: None,
            on_violation: ViolationPolicy::Assert,
            wait: WaitConfig::default(),
        }
    }

    /// Configuration for test doubles: violations are ignored
    pub fn for_testing() -> Self {
        Self::new().with_violation_policy(ViolationPolicy::Ignore)
    }

    /// Read overrides from the environment on top of the defaults
    ///
    /// - SYNC_BRIDGE_TIMEOUT_MS: timeout in milliseconds (`0` = none)
    /// - SYNC_BRIDGE_NAME: diagnostic label
    /// - SYNC_BRIDGE_ON_VIOLATION: `ignore`, `log` or `assert`
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::new().with_env_overrides()
    }

    /// Apply environment overrides to this configuration
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = std::env::var(ENV_TIMEOUT_MS) {
            match raw.trim().parse::<u64>() {
                Ok(0) => self.timeout = None,
                Ok(ms) => self.timeout = Some(Duration::from_millis(ms)),
                Err(e) => warn!(
                    var = ENV_TIMEOUT_MS,
                    value = %raw,
                    error = %e,
                    "Ignoring invalid timeout"
                ),
            }
        }

        if let Ok(name) = std::env::var(ENV_NAME) {
            if !name.trim().is_empty() {
                self.name = Some(name);
            }
        }

        if let Ok(raw) = std::env::var(ENV_ON_VIOLATION) {
            match raw.parse::<ViolationPolicy>() {
                Ok(policy) => self.on_violation = policy,
                Err(e) => warn!(
                    var = ENV_ON_VIOLATION,
                    error = %e,
                    "Ignoring invalid violation policy"
                ),
            }
        }

        self
    }

    /// Set the diagnostic label
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Wait indefinitely
    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Set the violation policy
    pub fn with_violation_policy(mut self, policy: ViolationPolicy) -> Self {
        self.on_violation = policy;
        self
    }

    /// Set the wait strategy configuration
    pub fn with_wait(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    /// Label used in diagnostics
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_OPERATION_LABEL)
    }
}
