/*!
 * Synchronous Bridge
 *
 * Executes an operation that reports its result through a completion
 * callback and blocks the calling thread until the callback fires, the
 * timeout elapses, or the operation fails while starting.
 *
 * ## Call Shapes
 *
 * All shapes share one protocol (a guarded [`Completion`]) and differ only
 * in how the delivered value maps to the call's result:
 *
 * | Method | Completion carries | Maps to |
 * |---|---|---|
 * | [`SyncBridge::call`] | `Result<R, E>` | `Ok` / `Failed` |
 * | [`SyncBridge::call_value`] | `R` | `Ok` |
 * | [`SyncBridge::call_unit`] | `Option<E>` | `None` → `Ok(())`, `Some` → `Failed` |
 * | [`SyncBridge::call_async`] | future output `Result<R, E>` | `Ok` / `Failed` |
 * | [`SyncBridge::call_async_value`] | future output `R` | `Ok` |
 *
 * ## Timeouts
 *
 * A timeout abandons the *observation*, not the operation. The wrapped work
 * keeps running and may still fire; that late fire is accepted by the guard
 * and its value is dropped.
 */

use super::config::BridgeConfig;
use super::pending::{Completion, PendingCall, Settled};
use super::spawn::Spawn;
use crate::core::errors::{Abandoned, BridgeError, BridgeResult, TimedOut};
use crate::core::timeout::Deadline;
use crate::monitoring::{call_span, generate_call_id, BridgeObserver};
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Blocking bridge for callback-completed and async operations
///
/// # Example
///
/// ```
/// use sync_bridge::{BridgeConfig, SyncBridge};
/// use std::time::Duration;
///
/// let bridge = SyncBridge::new(
///     BridgeConfig::new()
///         .with_name("lookup")
///         .with_timeout(Duration::from_secs(1)),
/// );
///
/// let value: Result<u32, _> = bridge.call_value(|completion| {
///     std::thread::spawn(move || {
///         completion.complete(42);
///     });
///     Ok::<(), std::io::Error>(())
/// });
///
/// assert_eq!(value.unwrap(), 42);
/// ```
#[derive(Clone, Default)]
pub struct SyncBridge {
    config: BridgeConfig,
    observer: Option<Arc<dyn BridgeObserver>>,
}

impl SyncBridge {
    /// Create a bridge with the given configuration
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            observer: None,
        }
    }

    /// Create a bridge with a diagnostic name and optional timeout
    pub fn named(name: impl Into<String>, timeout: Option<Duration>) -> Self {
        let mut config = BridgeConfig::new().with_name(name);
        config.timeout = timeout;
        Self::new(config)
    }

    /// Attach an outcome observer
    pub fn with_observer(mut self, observer: Arc<dyn BridgeObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Block on a callback that delivers a plain value, with no timeout
    ///
    /// A synchronous failure of `action` is returned as
    /// [`BridgeError::Start`] without waiting.
    pub fn sync<R, E, F>(action: F) -> BridgeResult<R, E>
    where
        R: Send,
        F: FnOnce(Completion<R>) -> Result<(), E>,
    {
        Self::default().call_value(action)
    }

    /// Block on a future spawned on `spawner`, with no timeout
    pub fn sync_async<R, Fut, S>(spawner: &S, future: Fut) -> BridgeResult<R, Infallible>
    where
        S: Spawn + ?Sized,
        R: Send + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        Self::default().call_async_value(spawner, future)
    }

    /// Block on a callback that delivers `Result<R, E>`
    ///
    /// `action` may also fail synchronously, in which case the error is
    /// returned as [`BridgeError::Start`] without waiting.
    pub fn call<R, E, F>(&self, action: F) -> BridgeResult<R, E>
    where
        R: Send,
        E: Send,
        F: FnOnce(Completion<Result<R, E>>) -> Result<(), E>,
    {
        self.execute(action, |result| result)
    }

    /// Block on a callback that delivers a plain value
    pub fn call_value<R, E, F>(&self, action: F) -> BridgeResult<R, E>
    where
        R: Send,
        F: FnOnce(Completion<R>) -> Result<(), E>,
    {
        self.execute(action, Ok)
    }

    /// Block on a callback that delivers an optional error
    ///
    /// `None` means success.
    pub fn call_unit<E, F>(&self, action: F) -> BridgeResult<(), E>
    where
        E: Send,
        F: FnOnce(Completion<Option<E>>) -> Result<(), E>,
    {
        self.execute(action, |error| match error {
            Some(e) => Err(e),
            None => Ok(()),
        })
    }

    /// Block on a fallible future spawned on `spawner`
    ///
    /// Timing out does not cancel the spawned task. A task that panics is
    /// dropped by its executor and reported as [`BridgeError::Abandoned`].
    pub fn call_async<R, E, Fut, S>(&self, spawner: &S, future: Fut) -> BridgeResult<R, E>
    where
        S: Spawn + ?Sized,
        R: Send + 'static,
        E: Send + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
    {
        self.call(|completion: Completion<Result<R, E>>| {
            spawner.spawn(Box::pin(async move {
                let output = future.await;
                completion.complete(output);
            }));
            Ok(())
        })
    }

    /// Block on an infallible future spawned on `spawner`
    pub fn call_async_value<R, Fut, S>(
        &self,
        spawner: &S,
        future: Fut,
    ) -> BridgeResult<R, Infallible>
    where
        S: Spawn + ?Sized,
        R: Send + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        self.call_value(|completion: Completion<R>| {
            spawner.spawn(Box::pin(async move {
                let output = future.await;
                completion.complete(output);
            }));
            Ok(())
        })
    }

    /// Run `action` against a fresh pending call and map the delivered value
    fn execute<T, R, E, F, M>(&self, action: F, map: M) -> BridgeResult<R, E>
    where
        T: Send,
        F: FnOnce(Completion<T>) -> Result<(), E>,
        M: FnOnce(T) -> Result<R, E>,
    {
        let what: Arc<str> = Arc::from(self.config.label());
        let call_id = generate_call_id();
        let span = call_span(&what, call_id);
        let _entered = span.enter();

        let started = Instant::now();
        let call = PendingCall::new(
            call_id,
            what.clone(),
            self.config.on_violation,
            &self.config.wait,
            self.observer.clone(),
        );

        debug!(timeout_ms = ?self.config.timeout.map(|d| d.as_millis()), "bridged call started");

        if let Err(e) = action(Completion::new(call.clone())) {
            return self.finish(&span, &what, started, Err(BridgeError::Start(e)));
        }

        // The timeout covers the wait only, not the action's synchronous setup
        let deadline = Deadline::new(self.config.timeout);
        let result = match call.wait(&deadline) {
            Settled::Value(value) => map(value).map_err(BridgeError::Failed),
            Settled::Abandoned => Err(BridgeError::Abandoned(Abandoned {
                what: what.to_string(),
            })),
            Settled::TimedOut => {
                let limit = deadline.limit().unwrap_or_default();
                warn!(
                    elapsed_ms = deadline.elapsed().as_millis() as u64,
                    timeout_ms = limit.as_millis() as u64,
                    "bridged call timed out; a late completion will be discarded"
                );
                Err(BridgeError::TimedOut(TimedOut::new(
                    &*what,
                    deadline.elapsed(),
                    limit,
                )))
            }
        };

        self.finish(&span, &what, started, result)
    }

    /// Record the outcome on the span and observer
    fn finish<R, E>(
        &self,
        span: &tracing::Span,
        what: &str,
        started: Instant,
        result: BridgeResult<R, E>,
    ) -> BridgeResult<R, E> {
        let elapsed = started.elapsed();
        span.record("elapsed_us", elapsed.as_micros() as u64);

        match &result {
            Ok(_) => {
                span.record("outcome", "success");
                if let Some(ref observer) = self.observer {
                    observer.on_success(what, elapsed);
                }
            }
            Err(e) => {
                let kind = e.kind();
                span.record("outcome", kind.as_str());
                debug!(kind = kind.as_str(), "bridged call failed");
                if let Some(ref observer) = self.observer {
                    observer.on_error(what, kind, elapsed);
                }
            }
        }

        result
    }
}

impl std::fmt::Debug for SyncBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncBridge")
            .field("config", &self.config)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
