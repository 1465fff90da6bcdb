/*!
 * Protocol Violations
 *
 * A completion that fires after another one was accepted breaks the
 * "call me exactly once" contract. The late value is dropped and the
 * caller never sees it; what else happens is decided by [`ViolationPolicy`].
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{error, warn};
use uuid::Uuid;

/// What to do when a completion fires more than once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationPolicy {
    /// Drop the late fire silently (test doubles that fire twice on purpose)
    Ignore,
    /// Drop the late fire and log a warning
    Log,
    /// Log an error and fail a debug assertion; release builds only log
    #[default]
    Assert,
}

impl ViolationPolicy {
    /// Get policy name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Log => "log",
            Self::Assert => "assert",
        }
    }

    /// Apply the policy to a detected violation
    pub(crate) fn report(&self, violation: &ProtocolViolation) {
        match self {
            Self::Ignore => {}
            Self::Log => {
                warn!(
                    call_id = %violation.call_id,
                    name = %violation.what,
                    "{}", violation
                );
            }
            Self::Assert => {
                error!(
                    call_id = %violation.call_id,
                    name = %violation.what,
                    "{}", violation
                );
                debug_assert!(false, "{}", violation);
            }
        }
    }
}

impl fmt::Display for ViolationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViolationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "log" => Ok(Self::Log),
            "assert" => Ok(Self::Assert),
            other => Err(format!("unknown violation policy: {}", other)),
        }
    }
}

/// Details of a rejected completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolViolation {
    /// Label of the bridged operation
    pub what: String,
    /// Id of the bridged call whose completion fired again
    pub call_id: Uuid,
}

impl fmt::Display for ProtocolViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} completion called multiple times", self.what)
    }
}
