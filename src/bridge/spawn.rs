/*!
 * Executors for Async Operations
 *
 * The async call shapes hand their future to a caller-supplied executor and
 * feed its single output into the same guarded completion used by the
 * callback shapes. The bridge never owns a runtime of its own.
 *
 * # Deadlocks
 *
 * Blocking a thread that the executor needs to drive the future never
 * finishes. Calling the bridge from inside a current-thread runtime with
 * that same runtime's handle is the classic case; use a multi-thread
 * runtime or [`ThreadSpawner`].
 */

use futures::future::BoxFuture;
use std::sync::Arc;
use tracing::error;

/// Something that can run a future to completion in the background
pub trait Spawn {
    /// Start `task`; its output is delivered through its own completion
    ///
    /// If the task cannot be started it must be dropped, which the bridge
    /// observes as an abandoned call.
    fn spawn(&self, task: BoxFuture<'static, ()>);
}

impl Spawn for tokio::runtime::Handle {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        // Detached: a timed-out caller does not cancel the task
        drop(tokio::runtime::Handle::spawn(self, task));
    }
}

impl Spawn for tokio::runtime::Runtime {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        drop(tokio::runtime::Runtime::spawn(self, task));
    }
}

impl<S: Spawn + ?Sized> Spawn for Arc<S> {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        (**self).spawn(task)
    }
}

impl<S: Spawn + ?Sized> Spawn for &S {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        (**self).spawn(task)
    }
}

/// Runs each task on a fresh OS thread with its own current-thread runtime
///
/// Useful when the caller has no runtime at hand, or is itself running on
/// one it must not block. Every driver compiled into tokio is enabled, so
/// the task may use timers and any other runtime resource.
#[derive(Debug, Clone, Default)]
pub struct ThreadSpawner {
    thread_name: Option<String>,
}

impl ThreadSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the spawned threads
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = Some(name.into());
        self
    }
}

impl Spawn for ThreadSpawner {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        let mut builder = std::thread::Builder::new();
        if let Some(ref name) = self.thread_name {
            builder = builder.name(name.clone());
        }

        let result = builder.spawn(move || {
            match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime.block_on(task),
                Err(e) => error!(error = %e, "Failed to build runtime for bridged task"),
            }
        });

        if let Err(e) = result {
            error!(error = %e, "Failed to spawn thread for bridged task");
        }
    }
}
