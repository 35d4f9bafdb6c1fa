//! Bridges from `Promise` to futures-style consumers.
//!
//! [`PromiseHandle`] exposes the blocking cancel/get/poll surface, while
//! [`Settling`] lets any executor `.await` a promise without blocking a
//! thread.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use pin_project_lite::pin_project;
use tokio::sync::oneshot;
use tokio::time::Sleep;

use crate::effect::runtime;
use crate::error::Error;

use super::{Outcome, Promise};

/// A cancel/get/poll view of a promise, returned by [`Promise::to_future`].
///
/// ```rust
/// use monadic::effect::Promise;
/// use std::time::Duration;
///
/// let handle = Promise::spawn(|| Ok::<_, std::io::Error>(3)).to_future();
/// assert_eq!(handle.get_timeout(Duration::from_secs(5)).ok(), Some(3));
/// assert!(handle.is_done());
/// assert!(!handle.cancel());
/// ```
#[derive(Debug, Clone)]
pub struct PromiseHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    promise: Promise<T>,
}

impl<T> PromiseHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(super) const fn new(promise: Promise<T>) -> Self {
        Self { promise }
    }

    /// Cancels the underlying promise if it is still active.
    pub fn cancel(&self) -> bool {
        self.promise.cancel()
    }

    /// Blocks until the promise settles.
    ///
    /// # Errors
    ///
    /// Returns the failure, cancellation or timeout the promise reports.
    pub fn get(&self) -> Result<T, Error> {
        self.promise.or_fail()
    }

    /// Blocks for at most `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`MonadError::Timeout`](crate::MonadError::Timeout) when the
    /// bound elapses, otherwise whatever [`get`](Self::get) would return.
    pub fn get_timeout(&self, timeout: Duration) -> Result<T, Error> {
        self.promise.with_timeout(timeout).or_fail()
    }

    /// Returns `true` once the promise settled in any way.
    pub fn is_done(&self) -> bool {
        self.promise.is_done()
    }

    /// Returns `true` if the promise was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.promise.is_cancelled()
    }
}

pin_project! {
    /// The future produced by `.await`ing a [`Promise`].
    ///
    /// Resolves with the promise's value or its failure. Cancellation surfaces
    /// as a [`MonadError::Cancelled`](crate::MonadError::Cancelled) error and
    /// the promise's wait bound, if any, as a timeout error. The bound is
    /// tracked on the worker runtime's timer, so any executor can poll it.
    #[must_use = "futures do nothing unless polled"]
    pub struct Settling<T> {
        #[pin]
        receiver: oneshot::Receiver<Outcome<T>>,
        #[pin]
        deadline: Option<Sleep>,
        timeout: Option<Duration>,
    }
}

impl<T> Settling<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn new(promise: &Promise<T>) -> Self {
        let (sender, receiver) = oneshot::channel();
        promise.observe(Box::new(move |outcome: &Outcome<T>| {
            let _ = sender.send(outcome.clone());
        }));
        let timeout = promise.timeout();
        let deadline = timeout.map(|limit| {
            let _guard = runtime::global().enter();
            tokio::time::sleep(limit)
        });
        Self {
            receiver,
            deadline,
            timeout,
        }
    }
}

impl<T> Future for Settling<T> {
    type Output = Result<T, Error>;

    fn poll(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        if let Poll::Ready(received) = this.receiver.poll(context) {
            return Poll::Ready(match received {
                Ok(outcome) => outcome.into_try().into_result(),
                // The cell was dropped unsettled, which only a runtime shutdown causes.
                Err(_) => Err(Error::cancelled()),
            });
        }
        if let Some(deadline) = this.deadline.as_pin_mut()
            && deadline.poll(context).is_ready()
        {
            let limit = this.timeout.unwrap_or_default();
            tracing::debug!(?limit, "awaited promise timed out");
            return Poll::Ready(Err(Error::timeout(limit)));
        }
        Poll::Pending
    }
}

impl<T> IntoFuture for Promise<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = Result<T, Error>;
    type IntoFuture = Settling<T>;

    fn into_future(self) -> Settling<T> {
        Settling::new(&self)
    }
}
