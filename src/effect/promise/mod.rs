//! Promise type - the asynchronous member of the monad family.
//!
//! A `Promise<T>` is a view over a cell that eventually holds a value, a
//! failure or a cancellation. It is backed either by an outcome known at
//! construction time or by work running on the global worker runtime.
//!
//! # Lifecycle
//!
//! ```text
//!            ┌──> Resolved
//!  Active ───┼──> Failed
//!            └──> Cancelled
//! ```
//!
//! Settlement happens at most once. A promise built with [`Promise::of`] is
//! born `Resolved`; one built with [`Promise::spawn`] or
//! [`Promise::from_future`] starts `Active`.
//!
//! # Composition
//!
//! `map`, `flat_map`, `filter`, `then`, `and` and `on_error` never block.
//! They register a continuation that runs on the worker runtime once the
//! source settles, and only if it resolved. Derived promises own a fresh
//! cell that forwards the source's failure or cancellation.
//!
//! # Blocking accessors
//!
//! [`Promise::wait`], [`Promise::or_fail`], [`Promise::or_throw`],
//! [`Promise::or_use`] and [`Promise::or_else`] block the calling thread
//! until the promise settles, or until the bound installed by
//! [`Promise::with_timeout`] elapses. An elapsed bound fails only that
//! accessor call; the promise and its backing work are left untouched.
//!
//! # Examples
//!
//! ```rust
//! use monadic::effect::Promise;
//! use std::time::Duration;
//!
//! let promise = Promise::spawn(|| {
//!     std::thread::sleep(Duration::from_millis(20));
//!     Ok::<_, std::io::Error>(21)
//! })
//! .map(|n| n * 2);
//!
//! assert_eq!(promise.or_fail().ok(), Some(42));
//! assert!(promise.is_resolved());
//! ```

mod combinators;
mod completion;
mod handle;

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;

use crate::control::Try;
use crate::error::{Error, MonadError};
use crate::typeclass::{Functor, Monad, TypeConstructor};

use super::runtime;

pub(crate) use completion::{Callback, Completion, Outcome, notify};
pub use handle::{PromiseHandle, Settling};

// =============================================================================
// State
// =============================================================================

/// A snapshot of a promise's lifecycle.
///
/// The state of an active promise can change right after it is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PromiseState {
    /// Not settled yet.
    Active,
    /// Settled with a value.
    Resolved,
    /// Settled with an error.
    Failed,
    /// Cancelled before it could settle.
    Cancelled,
}

/// Units accepted by [`Promise::max_time`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Converts `amount` of this unit into a [`Duration`], saturating on overflow.
    ///
    /// ```rust
    /// use monadic::effect::TimeUnit;
    /// use std::time::Duration;
    ///
    /// assert_eq!(TimeUnit::Minutes.to_duration(2), Duration::from_secs(120));
    /// ```
    #[must_use]
    pub const fn to_duration(self, amount: u64) -> Duration {
        match self {
            Self::Nanoseconds => Duration::from_nanos(amount),
            Self::Microseconds => Duration::from_micros(amount),
            Self::Milliseconds => Duration::from_millis(amount),
            Self::Seconds => Duration::from_secs(amount),
            Self::Minutes => Duration::from_secs(amount.saturating_mul(60)),
            Self::Hours => Duration::from_secs(amount.saturating_mul(60 * 60)),
            Self::Days => Duration::from_secs(amount.saturating_mul(24 * 60 * 60)),
        }
    }
}

// =============================================================================
// Promise Definition
// =============================================================================

enum Backing<T> {
    Settled(Outcome<T>),
    Pending(Arc<Completion<T>>),
}

impl<T: Clone> Clone for Backing<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Settled(outcome) => Self::Settled(outcome.clone()),
            Self::Pending(completion) => Self::Pending(Arc::clone(completion)),
        }
    }
}

/// A value that settles at most once, possibly on another thread.
///
/// Cloning a `Promise` yields another view of the same cell.
pub struct Promise<T> {
    backing: Backing<T>,
    timeout: Option<Duration>,
}

impl<T> Promise<T>
where
    T: Clone + Send + Sync + 'static,
{
    // =========================================================================
    // Construction
    // =========================================================================

    /// A promise born resolved with `value`.
    #[must_use]
    pub const fn of(value: T) -> Self {
        Self::settled(Outcome::Resolved(value))
    }

    /// A promise born failed with `error`.
    pub fn failed(error: impl Into<Error>) -> Self {
        Self::settled(Outcome::Failed(error.into()))
    }

    /// Runs a blocking `supplier` on the worker runtime's blocking pool.
    ///
    /// An `Err` return or a panic settles the promise as failed.
    ///
    /// ```rust
    /// use monadic::effect::Promise;
    ///
    /// let promise = Promise::<i32>::spawn(|| "x".parse::<i32>());
    /// assert!(promise.wait().is_failure());
    /// assert!(promise.is_failed());
    /// ```
    pub fn spawn<E, F>(supplier: F) -> Self
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
        E: Into<Error>,
    {
        let completion = Arc::new(Completion::new());
        let sink = Arc::clone(&completion);
        let task = runtime::spawn_blocking(move || {
            let outcome = Try::of(supplier);
            if let Some(error) = outcome.error().filter(|error| error.is_panic()) {
                tracing::warn!(%error, "promise producer panicked");
            }
            sink.settle(outcome.into());
        });
        completion.attach(task.abort_handle());
        Self::pending(completion)
    }

    /// Drives `future` on the worker runtime and settles with its output.
    ///
    /// Cancelling the promise aborts the task at its next suspension point.
    ///
    /// ```rust
    /// use monadic::effect::Promise;
    ///
    /// let promise = Promise::from_future(async { Ok::<_, std::io::Error>("ready") });
    /// assert_eq!(promise.or_fail().ok(), Some("ready"));
    /// ```
    pub fn from_future<E, Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<Error>,
    {
        let completion = Arc::new(Completion::new());
        let sink = Arc::clone(&completion);
        let task = runtime::spawn(async move {
            let outcome = match AssertUnwindSafe(future).catch_unwind().await {
                Ok(result) => Try::from(result),
                Err(payload) => {
                    let error = Error::from_panic(payload);
                    tracing::warn!(%error, "promise future panicked");
                    Try::Failure(error)
                }
            };
            sink.settle(outcome.into());
        });
        completion.attach(task.abort_handle());
        Self::pending(completion)
    }

    const fn settled(outcome: Outcome<T>) -> Self {
        Self {
            backing: Backing::Settled(outcome),
            timeout: None,
        }
    }

    pub(crate) const fn pending(completion: Arc<Completion<T>>) -> Self {
        Self {
            backing: Backing::Pending(completion),
            timeout: None,
        }
    }

    /// Hands the outcome to `callback` once settled.
    pub(crate) fn observe(&self, callback: Callback<T>) {
        match &self.backing {
            Backing::Settled(outcome) => notify(vec![callback], outcome),
            Backing::Pending(completion) => completion.subscribe(callback),
        }
    }

    fn forward_to(&self, sink: Arc<Completion<T>>) {
        self.observe(Box::new(move |outcome: &Outcome<T>| {
            sink.settle(outcome.clone());
        }));
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Returns the current lifecycle state.
    pub fn state(&self) -> PromiseState {
        match &self.backing {
            Backing::Settled(outcome) => outcome.state(),
            Backing::Pending(completion) => completion.state(),
        }
    }

    /// Returns `true` while the promise has not settled.
    pub fn is_active(&self) -> bool {
        self.state() == PromiseState::Active
    }

    /// Returns `true` if the promise settled with a value.
    pub fn is_resolved(&self) -> bool {
        self.state() == PromiseState::Resolved
    }

    /// Returns `true` if the promise settled with an error.
    pub fn is_failed(&self) -> bool {
        self.state() == PromiseState::Failed
    }

    /// Returns `true` if the promise was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.state() == PromiseState::Cancelled
    }

    /// Returns `true` once the promise reached any terminal state.
    pub fn is_done(&self) -> bool {
        !self.is_active()
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Chains a dependent promise once this one resolves.
    ///
    /// `function` runs on the worker runtime, never on the caller. A panic
    /// inside it fails the derived promise.
    pub fn flat_map<B, F>(self, function: F) -> Promise<B>
    where
        F: FnOnce(T) -> Promise<B> + Send + 'static,
        B: Clone + Send + Sync + 'static,
    {
        match self.backing {
            Backing::Settled(Outcome::Resolved(value)) => {
                match catch_unwind(AssertUnwindSafe(|| function(value))) {
                    Ok(next) => next,
                    Err(payload) => Promise::failed(Error::from_panic(payload)),
                }
            }
            Backing::Settled(Outcome::Failed(error)) => Promise::failed(error),
            Backing::Settled(Outcome::Cancelled) => Promise::settled(Outcome::Cancelled),
            Backing::Pending(source) => {
                let completion = Arc::new(Completion::new());
                let sink = Arc::clone(&completion);
                source.subscribe(Box::new(move |outcome: &Outcome<T>| match outcome {
                    // A derived promise cancelled before its source resolved never runs `function`.
                    Outcome::Resolved(_) if sink.state() != PromiseState::Active => {}
                    Outcome::Resolved(value) => {
                        let value = value.clone();
                        let target = Arc::clone(&sink);
                        let task = runtime::spawn_blocking(move || {
                            if target.state() != PromiseState::Active {
                                return;
                            }
                            match catch_unwind(AssertUnwindSafe(|| function(value))) {
                                Ok(next) => next.forward_to(target),
                                Err(payload) => {
                                    let error = Error::from_panic(payload);
                                    tracing::warn!(%error, "promise continuation panicked");
                                    target.settle(Outcome::Failed(error));
                                }
                            }
                        });
                        sink.attach(task.abort_handle());
                    }
                    Outcome::Failed(error) => {
                        sink.settle(Outcome::Failed(error.clone()));
                    }
                    Outcome::Cancelled => {
                        sink.settle(Outcome::Cancelled);
                    }
                }));
                Promise::pending(completion)
            }
        }
    }

    /// Transforms the value once resolved.
    ///
    /// ```rust
    /// use monadic::effect::Promise;
    ///
    /// assert_eq!(Promise::of(4).map(|n| n * n).or_use(0), 16);
    /// ```
    pub fn map<B, F>(self, function: F) -> Promise<B>
    where
        F: FnOnce(T) -> B + Send + 'static,
        B: Clone + Send + Sync + 'static,
    {
        self.flat_map(move |value| Promise::of(function(value)))
    }

    /// Transforms the value with a fallible function.
    pub fn try_map<B, E, F>(self, function: F) -> Promise<B>
    where
        F: FnOnce(T) -> Result<B, E> + Send + 'static,
        E: Into<Error>,
        B: Clone + Send + Sync + 'static,
    {
        self.flat_map(move |value| Promise::from(Try::of(|| function(value))))
    }

    /// Fails with [`MonadError::CriteriaNotMet`] when `predicate` rejects the value.
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: FnOnce(&T) -> bool + Send + 'static,
    {
        self.flat_map(move |value| {
            if predicate(&value) {
                Self::of(value)
            } else {
                Self::failed(MonadError::CriteriaNotMet)
            }
        })
    }

    /// Runs `consumer` with the value once resolved.
    pub fn then<F>(self, consumer: F) -> Promise<()>
    where
        F: FnOnce(T) + Send + 'static,
    {
        self.map(consumer)
    }

    /// Joins with `other` once both resolve.
    ///
    /// Both promises keep running concurrently. A failure of `self` is
    /// reported before one of `other`.
    ///
    /// ```rust
    /// use monadic::effect::Promise;
    ///
    /// let left = Promise::spawn(|| Ok::<_, std::io::Error>(6));
    /// let right = Promise::spawn(|| Ok::<_, std::io::Error>(7));
    /// assert_eq!(left.and(right, |a, b| a * b).or_fail().ok(), Some(42));
    /// ```
    pub fn and<U, C, F>(self, other: Promise<U>, joiner: F) -> Promise<C>
    where
        U: Clone + Send + Sync + 'static,
        C: Clone + Send + Sync + 'static,
        F: FnOnce(T, U) -> C + Send + 'static,
    {
        self.flat_map(move |left| other.map(move |right| joiner(left, right)))
    }

    /// Registers `handler` to run once if the promise fails.
    ///
    /// The handler runs on whichever thread settles the promise and never
    /// changes the promise's own outcome.
    #[must_use]
    pub fn on_error<H>(self, handler: H) -> Self
    where
        H: FnOnce(&Error) + Send + 'static,
    {
        self.observe(Box::new(move |outcome: &Outcome<T>| {
            if let Outcome::Failed(error) = outcome {
                handler(error);
            }
        }));
        self
    }

    // =========================================================================
    // Cancellation and Timeouts
    // =========================================================================

    /// Cancels the promise if it is still active.
    ///
    /// Returns `false` when the promise had already settled. Blocking work
    /// that already started runs to completion; its result is discarded.
    pub fn cancel(&self) -> bool {
        match &self.backing {
            Backing::Pending(completion) => completion.cancel(),
            Backing::Settled(_) => {
                tracing::debug!("cancellation rejected: promise born settled");
                false
            }
        }
    }

    /// A view of the same cell whose blocking accessors give up after `timeout`.
    ///
    /// ```rust
    /// use monadic::effect::Promise;
    /// use std::time::Duration;
    ///
    /// let slow = Promise::spawn(|| {
    ///     std::thread::sleep(Duration::from_millis(100));
    ///     Ok::<_, std::io::Error>(1)
    /// });
    /// assert_eq!(slow.with_timeout(Duration::from_millis(1)).or_use(0), 0);
    /// assert_eq!(slow.or_use(0), 1);
    /// ```
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            backing: self.backing.clone(),
            timeout: Some(timeout),
        }
    }

    /// Same as [`with_timeout`](Self::with_timeout) with the bound given as an amount of `unit`.
    #[must_use]
    pub fn max_time(&self, amount: u64, unit: TimeUnit) -> Self {
        self.with_timeout(unit.to_duration(amount))
    }

    /// Returns the wait bound of this view, if any.
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    // =========================================================================
    // Blocking Accessors
    // =========================================================================

    /// Blocks until settled and captures the outcome.
    ///
    /// Cancellation and an elapsed wait bound both surface as failures.
    pub fn wait(&self) -> Try<T> {
        match &self.backing {
            Backing::Settled(outcome) => outcome.clone().into_try(),
            Backing::Pending(completion) => match completion.wait(self.timeout) {
                Some(outcome) => outcome.into_try(),
                None => {
                    let limit = self.timeout.unwrap_or_default();
                    tracing::debug!(?limit, "promise accessor timed out");
                    Try::Failure(Error::timeout(limit))
                }
            },
        }
    }

    /// Blocks and returns the value.
    ///
    /// # Errors
    ///
    /// Returns the captured error, a cancellation error or a timeout error.
    pub fn or_fail(&self) -> Result<T, Error> {
        self.wait().or_fail()
    }

    /// Blocks and returns the value, remapping any failure with `mapper`.
    ///
    /// # Errors
    ///
    /// Returns `mapper(error)` when [`or_fail`](Self::or_fail) would fail.
    pub fn or_throw<E, M>(&self, mapper: M) -> Result<T, E>
    where
        M: FnOnce(Error) -> E,
    {
        self.wait().or_throw(mapper)
    }

    /// Blocks and returns the value, or `default` on any failure.
    pub fn or_use(&self, default: T) -> T {
        self.wait().or_use(default)
    }

    /// Blocks and returns the value, handing any failure to `handler`.
    pub fn or_else<H>(&self, handler: H) -> Option<T>
    where
        H: FnOnce(&Error),
    {
        self.wait().or_else(handler)
    }

    /// Adapts the promise to a cancel/get/poll handle.
    #[must_use]
    pub fn to_future(&self) -> PromiseHandle<T> {
        PromiseHandle::new(self.clone())
    }
}

impl<T: Clone> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            backing: self.backing.clone(),
            timeout: self.timeout,
        }
    }
}

impl<T> From<Try<T>> for Promise<T> {
    fn from(attempt: Try<T>) -> Self {
        Self {
            backing: Backing::Settled(attempt.into()),
            timeout: None,
        }
    }
}

impl<T> fmt::Debug for Promise<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Promise")
            .field("state", &self.state())
            .field("timeout", &self.timeout)
            .finish()
    }
}

static_assertions::assert_impl_all!(Promise<i32>: Send, Sync, Clone);
static_assertions::assert_impl_all!(PromiseState: Send, Sync, Copy);

// =============================================================================
// Type Class Implementations
// =============================================================================

impl<T> TypeConstructor for Promise<T> {
    type Inner = T;
    type WithType<B> = Promise<B>;
}

impl<T> Functor for Promise<T>
where
    T: Clone + Send + Sync + 'static,
{
    #[inline]
    fn fmap<B, F>(self, function: F) -> Promise<B>
    where
        F: Fn(T) -> B + Send + Sync + 'static,
        B: Clone + Send + Sync + 'static,
    {
        self.map(function)
    }
}

impl<T> Monad for Promise<T>
where
    T: Clone + Send + Sync + 'static,
{
    #[inline]
    fn pure(value: T) -> Self {
        Self::of(value)
    }

    #[inline]
    fn flat_map<B, F>(self, function: F) -> Promise<B>
    where
        F: Fn(T) -> Promise<B> + Send + Sync + 'static,
        B: Clone + Send + Sync + 'static,
    {
        Self::flat_map(self, function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::thread;

    fn delayed<T>(millis: u64, value: T) -> Promise<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        Promise::spawn(move || {
            thread::sleep(Duration::from_millis(millis));
            Ok::<_, Error>(value)
        })
    }

    #[rstest]
    fn of_is_born_resolved() {
        let promise = Promise::of(5);
        assert!(promise.is_resolved());
        assert!(promise.is_done());
        assert_eq!(promise.or_fail().ok(), Some(5));
    }

    #[rstest]
    fn spawned_promise_starts_active_and_resolves() {
        let promise = delayed(50, 5);
        assert_eq!(promise.state(), PromiseState::Active);
        assert_eq!(promise.wait().ok(), Some(5));
        assert_eq!(promise.state(), PromiseState::Resolved);
    }

    #[rstest]
    fn spawn_keeps_the_original_error() {
        let promise = Promise::<i32>::spawn(|| Err(io::Error::other("unreachable host")));
        let error = promise.or_fail().unwrap_err();
        assert!(error.is::<io::Error>());
        assert!(promise.is_failed());
    }

    #[rstest]
    fn spawn_captures_panics() {
        let promise = Promise::<i32>::spawn(|| -> Result<i32, Error> { panic!("worker exploded") });
        assert!(promise.wait().error().is_some_and(Error::is_panic));
    }

    #[rstest]
    fn map_on_pending_promise_does_not_block() {
        let promise = delayed(50, 2).map(|n| n + 1);
        assert!(promise.is_active());
        assert_eq!(promise.or_use(0), 3);
    }

    #[rstest]
    fn failed_source_skips_continuations() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let promise = Promise::<i32>::spawn(|| Err(io::Error::other("x"))).map(move |n| {
            counter.fetch_add(1, Ordering::SeqCst);
            n
        });
        assert!(promise.wait().is_failure());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    #[case::settled(Promise::of(1))]
    #[case::pending(delayed(5, 1))]
    fn panicking_mapping_fails_the_derived_promise(#[case] source: Promise<i32>) {
        let derived = source.map(|_| -> i32 { panic!("mapping exploded") });
        assert!(derived.wait().error().is_some_and(Error::is_panic));
    }

    #[rstest]
    fn flat_map_waits_for_the_inner_promise() {
        let promise = delayed(5, 2).flat_map(|n| delayed(5, n * 10));
        assert_eq!(promise.or_fail().ok(), Some(20));
    }

    #[rstest]
    #[case(4, true)]
    #[case(3, false)]
    fn filter_reports_unmet_criteria(#[case] value: i32, #[case] kept: bool) {
        let result = delayed(1, value).filter(|n| n % 2 == 0).wait();
        assert_eq!(result.is_success(), kept);
        if !kept {
            assert_eq!(
                result.error().and_then(Error::kind),
                Some(&MonadError::CriteriaNotMet)
            );
        }
    }

    #[rstest]
    fn try_map_captures_conversion_errors() {
        let parsed = Promise::of("12x".to_string()).try_map(|text| text.parse::<i32>());
        assert!(parsed.wait().error().is_some_and(|error| error.is::<std::num::ParseIntError>()));
    }

    #[rstest]
    fn then_runs_the_consumer_once() {
        let (sender, receiver) = mpsc::channel();
        let done = delayed(1, 9).then(move |n| {
            let _ = sender.send(n);
        });
        assert!(done.wait().is_success());
        assert_eq!(receiver.recv_timeout(Duration::from_secs(1)), Ok(9));
    }

    #[rstest]
    fn and_reports_the_left_failure() {
        let joined = Promise::<i32>::failed(io::Error::other("left"))
            .and(Promise::<i32>::failed(io::Error::other("right")), |a, b| a + b);
        assert_eq!(joined.or_fail().unwrap_err().to_string(), "left");
    }

    #[rstest]
    fn on_error_runs_once_and_keeps_the_outcome() {
        let (sender, receiver) = mpsc::channel();
        let promise =
            Promise::<i32>::spawn(|| Err(io::Error::other("boom"))).on_error(move |error| {
                let _ = sender.send(error.to_string());
            });
        assert!(promise.wait().is_failure());
        assert_eq!(
            receiver.recv_timeout(Duration::from_secs(1)),
            Ok("boom".to_string())
        );
        assert!(receiver.recv_timeout(Duration::from_millis(20)).is_err());
        assert!(promise.is_failed());
    }

    #[rstest]
    fn on_error_is_silent_on_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let promise = delayed(1, 1).on_error(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(promise.or_use(0), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    fn cancel_is_rejected_once_settled() {
        let promise = delayed(1, 1);
        assert!(promise.wait().is_success());
        assert!(!promise.cancel());
        assert!(!Promise::of(1).cancel());
    }

    #[rstest]
    fn cancel_settles_an_active_promise() {
        let promise = delayed(200, 1);
        assert!(promise.cancel());
        assert!(promise.is_cancelled());
        assert!(!promise.cancel());
        assert!(promise.wait().error().is_some_and(Error::is_cancelled));
    }

    #[rstest]
    fn cancellation_is_forwarded_to_derived_promises() {
        let source = delayed(200, 1);
        let derived = source.clone().map(|n| n + 1);
        assert!(source.cancel());
        assert!(derived.wait().error().is_some_and(Error::is_cancelled));
        assert!(derived.is_cancelled());
    }

    #[rstest]
    fn cancelled_derived_promise_skips_its_continuation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let source = delayed(20, 1);
        let derived = source.clone().then(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(derived.cancel());
        assert_eq!(source.or_use(0), 1);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(derived.is_cancelled());
        assert!(source.is_resolved());
    }

    #[rstest]
    fn timeout_bounds_only_the_timed_view() {
        let slow = delayed(100, 7);
        let timed = slow.with_timeout(Duration::from_millis(1));
        assert_eq!(timed.timeout(), Some(Duration::from_millis(1)));
        assert!(timed.wait().error().is_some_and(Error::is_timeout));
        assert_eq!(timed.or_use(0), 0);
        assert_eq!(slow.timeout(), None);
        assert_eq!(slow.or_use(0), 7);
    }

    #[rstest]
    fn max_time_converts_units() {
        let timed = delayed(1, 1).max_time(2, TimeUnit::Seconds);
        assert_eq!(timed.timeout(), Some(Duration::from_secs(2)));
        assert_eq!(timed.or_use(0), 1);
    }

    #[rstest]
    #[case(TimeUnit::Nanoseconds, Duration::from_nanos(3))]
    #[case(TimeUnit::Microseconds, Duration::from_micros(3))]
    #[case(TimeUnit::Milliseconds, Duration::from_millis(3))]
    #[case(TimeUnit::Hours, Duration::from_secs(3 * 3600))]
    #[case(TimeUnit::Days, Duration::from_secs(3 * 86_400))]
    fn time_units_convert(#[case] unit: TimeUnit, #[case] expected: Duration) {
        assert_eq!(unit.to_duration(3), expected);
    }

    #[rstest]
    fn or_throw_and_or_else_see_the_same_failure() {
        let promise = Promise::<i32>::failed(io::Error::other("offline"));
        assert_eq!(promise.or_throw(|error| error.to_string()), Err("offline".to_string()));
        let seen = AtomicUsize::new(0);
        assert_eq!(
            promise.or_else(|_| {
                seen.fetch_add(1, Ordering::SeqCst);
            }),
            None
        );
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn from_try_keeps_the_outcome() {
        assert!(Promise::from(Try::success(1)).is_resolved());
        assert!(Promise::<i32>::from(Try::failure(io::Error::other("x"))).is_failed());
    }

    #[rstest]
    fn debug_shows_state() {
        assert_eq!(
            format!("{:?}", Promise::of(1)),
            "Promise { state: Resolved, timeout: None }"
        );
    }
}
