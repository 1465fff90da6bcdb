/*!
 * Pending Call
 *
 * The per-invocation state shared between the blocked caller and the
 * completion path: guard, result slot and wait handle. It is created fresh
 * for every bridged call and never reused.
 *
 * # Lifetime
 *
 * The caller holds one reference; every live [`Completion`] holds another.
 * After a timeout the caller's reference is gone but the completion's stays,
 * so a late fire still lands in a valid slot and is simply never read.
 * When the last completion is dropped without having fired, the call is
 * marked abandoned and the caller is woken.
 */

use super::violation::{ProtocolViolation, ViolationPolicy};
use crate::core::sync::{CompletionGuard, GuardState, PendingResult, WaitConfig, WaitHandle};
use crate::core::timeout::Deadline;
use crate::monitoring::BridgeObserver;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Result of firing a [`Completion`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fire {
    /// This fire won; its value is what the caller receives
    Accepted,
    /// Another fire already won; this value was dropped
    Rejected,
}

impl Fire {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Fire::Accepted)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Fire::Rejected)
    }
}

/// How a wait on a pending call ended
#[derive(Debug)]
pub(crate) enum Settled<T> {
    Value(T),
    Abandoned,
    TimedOut,
}

/// Shared state of one bridged call
pub(crate) struct PendingCall<T> {
    guard: CompletionGuard,
    slot: PendingResult<T>,
    handle: WaitHandle,
    senders: AtomicUsize,
    call_id: Uuid,
    what: Arc<str>,
    policy: ViolationPolicy,
    observer: Option<Arc<dyn BridgeObserver>>,
}

impl<T> PendingCall<T> {
    pub(crate) fn new(
        call_id: Uuid,
        what: Arc<str>,
        policy: ViolationPolicy,
        wait: &WaitConfig,
        observer: Option<Arc<dyn BridgeObserver>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            guard: CompletionGuard::new(),
            slot: PendingResult::new(),
            handle: WaitHandle::new(wait),
            senders: AtomicUsize::new(0),
            call_id,
            what,
            policy,
            observer,
        })
    }

    /// Deliver a value through the single-fire guard
    fn settle(&self, value: T) -> Fire {
        match self.guard.try_complete() {
            Ok(()) => {
                let stored = self.slot.put(value).is_ok();
                debug_assert!(stored, "result slot written without winning the guard");
                self.handle.signal();
                Fire::Accepted
            }
            Err(_) => {
                self.report_violation();
                Fire::Rejected
            }
        }
    }

    /// Mark the call abandoned if nothing has fired
    fn abandon(&self) {
        if self.guard.try_abandon().is_ok() {
            tracing::debug!(
                call_id = %self.call_id,
                name = %self.what,
                "completion dropped without firing"
            );
            self.handle.signal();
        }
    }

    #[cold]
    #[inline(never)]
    fn report_violation(&self) {
        let violation = ProtocolViolation {
            what: self.what.to_string(),
            call_id: self.call_id,
        };

        if let Some(ref observer) = self.observer {
            observer.on_violation(&violation);
        }

        self.policy.report(&violation);
    }

    /// Block the calling thread until the call settles or the deadline passes
    pub(crate) fn wait(&self, deadline: &Deadline) -> Settled<T> {
        if !self.handle.wait(deadline) {
            return Settled::TimedOut;
        }

        match self.guard.state() {
            GuardState::Completed => match self.slot.take() {
                Some(value) => Settled::Value(value),
                // Slot is written before the handle is signaled
                None => Settled::Abandoned,
            },
            GuardState::Abandoned => Settled::Abandoned,
            GuardState::Unarmed => Settled::TimedOut,
        }
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.guard.is_armed()
    }
}

/// Completion callback handed to a bridged action
///
/// Call [`Completion::complete`] exactly once. Clones share the same
/// pending call, so the action may hand copies to other threads; only the
/// first fire across all clones is accepted.
pub struct Completion<T> {
    call: Arc<PendingCall<T>>,
}

impl<T> Completion<T> {
    pub(crate) fn new(call: Arc<PendingCall<T>>) -> Self {
        call.senders.fetch_add(1, Ordering::Relaxed);
        Self { call }
    }

    /// Deliver the operation's result
    ///
    /// Returns [`Fire::Rejected`] if a result was already delivered; the
    /// rejected value is dropped and the call's violation policy applies.
    pub fn complete(&self, value: T) -> Fire {
        self.call.settle(value)
    }

    /// Check if the call already has its result (or was abandoned)
    pub fn is_settled(&self) -> bool {
        self.call.is_settled()
    }

    /// Id of the bridged call this completion belongs to
    pub fn call_id(&self) -> Uuid {
        self.call.call_id
    }
}

impl<T> Clone for Completion<T> {
    fn clone(&self) -> Self {
        Self::new(self.call.clone())
    }
}

impl<T> Drop for Completion<T> {
    fn drop(&mut self) {
        if self.call.senders.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.call.abandon();
        }
    }
}

impl<T> std::fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("call_id", &self.call.call_id)
            .field("what", &self.call.what)
            .field("settled", &self.is_settled())
            .finish()
    }
}
