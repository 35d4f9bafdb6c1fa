//! The single-settlement cell behind every pending `Promise`.
//!
//! A `Completion` starts out active and settles at most once. Settlement,
//! cancellation and callback registration all go through one lock, so a
//! reader never observes a partially settled cell and every callback sees
//! the same outcome exactly once.

use std::mem;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tokio::task::AbortHandle;

use crate::control::Try;
use crate::error::Error;

use super::PromiseState;

/// Type alias for a callback run once the cell settles.
pub(crate) type Callback<T> = Box<dyn FnOnce(&Outcome<T>) + Send>;

/// The terminal state of a promise.
#[derive(Debug, Clone)]
pub(crate) enum Outcome<T> {
    Resolved(T),
    Failed(Error),
    Cancelled,
}

impl<T> Outcome<T> {
    pub(crate) const fn state(&self) -> PromiseState {
        match self {
            Self::Resolved(_) => PromiseState::Resolved,
            Self::Failed(_) => PromiseState::Failed,
            Self::Cancelled => PromiseState::Cancelled,
        }
    }

    /// Cancellation surfaces to accessors as a [`MonadError::Cancelled`](crate::MonadError::Cancelled) failure.
    pub(crate) fn into_try(self) -> Try<T> {
        match self {
            Self::Resolved(value) => Try::Success(value),
            Self::Failed(error) => Try::Failure(error),
            Self::Cancelled => Try::Failure(Error::cancelled()),
        }
    }
}

impl<T> From<Try<T>> for Outcome<T> {
    fn from(attempt: Try<T>) -> Self {
        match attempt {
            Try::Success(value) => Self::Resolved(value),
            Try::Failure(error) => Self::Failed(error),
        }
    }
}

struct Slot<T> {
    outcome: Option<Outcome<T>>,
    callbacks: Vec<Callback<T>>,
    abort: Option<AbortHandle>,
}

pub(crate) struct Completion<T> {
    slot: Mutex<Slot<T>>,
    settled: Condvar,
}

impl<T: Clone> Completion<T> {
    pub(crate) fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                outcome: None,
                callbacks: Vec::new(),
                abort: None,
            }),
            settled: Condvar::new(),
        }
    }

    pub(crate) fn state(&self) -> PromiseState {
        self.slot
            .lock()
            .outcome
            .as_ref()
            .map_or(PromiseState::Active, Outcome::state)
    }

    /// Remembers how to abort the backing task; ignored once settled.
    pub(crate) fn attach(&self, abort: AbortHandle) {
        let mut slot = self.slot.lock();
        if slot.outcome.is_none() {
            slot.abort = Some(abort);
        }
    }

    /// Settles the cell. Returns `false` if it had already settled.
    pub(crate) fn settle(&self, outcome: Outcome<T>) -> bool {
        let Some((callbacks, _)) = self.transition(&outcome) else {
            return false;
        };
        tracing::trace!(state = ?outcome.state(), "promise settled");
        notify(callbacks, &outcome);
        true
    }

    /// Cancels the cell and its backing task if still active.
    pub(crate) fn cancel(&self) -> bool {
        let outcome = Outcome::Cancelled;
        let Some((callbacks, abort)) = self.transition(&outcome) else {
            tracing::debug!("cancellation rejected: promise already settled");
            return false;
        };
        if let Some(abort) = abort {
            abort.abort();
        }
        tracing::debug!("promise cancelled");
        notify(callbacks, &outcome);
        true
    }

    fn transition(&self, outcome: &Outcome<T>) -> Option<(Vec<Callback<T>>, Option<AbortHandle>)> {
        let mut slot = self.slot.lock();
        if slot.outcome.is_some() {
            return None;
        }
        slot.outcome = Some(outcome.clone());
        self.settled.notify_all();
        Some((mem::take(&mut slot.callbacks), slot.abort.take()))
    }

    /// Runs `callback` once settled; immediately if that already happened.
    pub(crate) fn subscribe(&self, callback: Callback<T>) {
        let mut slot = self.slot.lock();
        let settled = slot.outcome.clone();
        match settled {
            Some(outcome) => {
                drop(slot);
                notify(vec![callback], &outcome);
            }
            None => slot.callbacks.push(callback),
        }
    }

    /// Blocks until settled or until `timeout` elapses.
    ///
    /// Returns `None` only when the wait bound elapsed first.
    pub(crate) fn wait(&self, timeout: Option<Duration>) -> Option<Outcome<T>> {
        let mut slot = self.slot.lock();
        let deadline = timeout.and_then(|limit| Instant::now().checked_add(limit));
        while slot.outcome.is_none() {
            match deadline {
                Some(deadline) => {
                    if self.settled.wait_until(&mut slot, deadline).timed_out() {
                        break;
                    }
                }
                None => self.settled.wait(&mut slot),
            }
        }
        slot.outcome.clone()
    }
}

// A panicking callback must not starve the ones registered after it.
pub(crate) fn notify<T>(callbacks: Vec<Callback<T>>, outcome: &Outcome<T>) {
    for callback in callbacks {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| callback(outcome))) {
            let error = Error::from_panic(payload);
            tracing::warn!(%error, "promise callback panicked");
        }
    }
}
