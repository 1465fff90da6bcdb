/*!
 * Error Types
 * Closed error taxonomy for bridged calls, with thiserror and miette support
 *
 * A bridged call ends in exactly one of: the operation's value, the
 * operation's own error (raised while starting or delivered through the
 * completion), a timeout, or abandonment. Protocol violations (a completion
 * firing twice) are never returned to the caller.
 */

use miette::Diagnostic;
use std::time::Duration;
use thiserror::Error;

/// Result type for bridged calls
pub type BridgeResult<T, E> = Result<T, BridgeError<E>>;

/// Stable discriminant for [`BridgeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The action failed before arranging its completion
    Start,
    /// The completion delivered an error
    Failed,
    /// The deadline elapsed before the completion fired
    TimedOut,
    /// Every completion handle was dropped without firing
    Abandoned,
}

impl ErrorKind {
    /// Get error kind as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Failed => "failed",
            Self::TimedOut => "timed_out",
            Self::Abandoned => "abandoned",
        }
    }
}

/// The wait deadline elapsed before the completion fired
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
#[error("{what} timed out after {elapsed_ms}ms (limit {timeout_ms}ms)")]
#[diagnostic(
    code(bridge::timed_out),
    help("The operation may still complete later; its result is discarded. Raise the timeout or check the operation's completion path.")
)]
pub struct TimedOut {
    pub what: String,
    pub elapsed_ms: u64,
    pub timeout_ms: u64,
}

impl TimedOut {
    /// Create a timeout error
    pub fn new(what: impl Into<String>, elapsed: Duration, timeout: Duration) -> Self {
        Self {
            what: what.into(),
            elapsed_ms: elapsed.as_millis() as u64,
            timeout_ms: timeout.as_millis() as u64,
        }
    }
}

/// The action dropped every completion handle without firing
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
#[error("{what} dropped its completion without calling it")]
#[diagnostic(
    code(bridge::abandoned),
    help("The action (or the task it spawned) ended without completing. A panicking async task ends this way.")
)]
pub struct Abandoned {
    pub what: String,
}

/// Errors returned by a bridged call
///
/// `E` is the wrapped operation's own error type. It is carried unchanged in
/// [`BridgeError::Start`] and [`BridgeError::Failed`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError<E> {
    #[error("operation failed to start: {0}")]
    Start(E),

    #[error("operation failed: {0}")]
    Failed(E),

    #[error(transparent)]
    TimedOut(#[from] TimedOut),

    #[error(transparent)]
    Abandoned(#[from] Abandoned),
}

impl<E> BridgeError<E> {
    /// Get the discriminant of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Start(_) => ErrorKind::Start,
            Self::Failed(_) => ErrorKind::Failed,
            Self::TimedOut(_) => ErrorKind::TimedOut,
            Self::Abandoned(_) => ErrorKind::Abandoned,
        }
    }

    /// Check if the call timed out
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut(_))
    }

    /// Check if the error came from the wrapped operation itself
    pub fn is_operation_error(&self) -> bool {
        matches!(self, Self::Start(_) | Self::Failed(_))
    }

    /// Borrow the wrapped operation's error, if any
    pub fn operation_error(&self) -> Option<&E> {
        match self {
            Self::Start(e) | Self::Failed(e) => Some(e),
            Self::TimedOut(_) | Self::Abandoned(_) => None,
        }
    }

    /// Take the wrapped operation's error, if any
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::Start(e) | Self::Failed(e) => Some(e),
            Self::TimedOut(_) | Self::Abandoned(_) => None,
        }
    }

    /// Map the wrapped operation's error type
    pub fn map_err<F, O>(self, op: O) -> BridgeError<F>
    where
        O: FnOnce(E) -> F,
    {
        match self {
            Self::Start(e) => BridgeError::Start(op(e)),
            Self::Failed(e) => BridgeError::Failed(op(e)),
            Self::TimedOut(t) => BridgeError::TimedOut(t),
            Self::Abandoned(a) => BridgeError::Abandoned(a),
        }
    }
}
