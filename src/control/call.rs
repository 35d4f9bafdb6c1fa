//! Call type - a deferred computation that is re-run on every evaluation.
//!
//! `Call<T>` stores a producer without running it. Every terminal operation
//! (`or_use`, `or_fail`, `or_throw`, `or_else`) and every [`Call::to_try`]
//! runs the producer again from scratch; nothing is memoized. Mapping a
//! `Call` composes producers, so the mapped `Call` re-runs the whole upstream
//! chain each time it is evaluated.
//!
//! Wrap the producer in your own cache before building the `Call` when the
//! result should be computed once.
//!
//! # Examples
//!
//! ```rust
//! use monadic::control::Call;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let runs = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&runs);
//! let call = Call::of(move || Ok::<_, std::io::Error>(counter.fetch_add(1, Ordering::SeqCst)))
//!     .map(|previous| previous * 10);
//!
//! // Nothing has run yet.
//! assert_eq!(runs.load(Ordering::SeqCst), 0);
//!
//! assert_eq!(call.or_fail().ok(), Some(0));
//! assert_eq!(call.or_fail().ok(), Some(10));
//! assert_eq!(runs.load(Ordering::SeqCst), 2);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, MonadError};
use crate::typeclass::{Functor, Monad, TypeConstructor};

use super::Try;

/// Type alias for the shared producer stored inside a `Call`.
type Supplier<T> = Arc<dyn Fn() -> Result<T, Error> + Send + Sync>;

/// A re-runnable deferred computation.
///
/// Cloning a `Call` shares its producer. Equality is identity of the stored
/// producer, never of any evaluated value.
pub struct Call<T> {
    supplier: Supplier<T>,
}

impl<T: 'static> Call<T> {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Stores `supplier` without running it.
    pub fn of<E, F>(supplier: F) -> Self
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
        E: Into<Error>,
    {
        Self::from_supplier(move || supplier().map_err(Into::into))
    }

    /// A call that always produces a clone of `value`.
    pub fn pure(value: T) -> Self
    where
        T: Clone + Send + Sync,
    {
        Self::from_supplier(move || Ok(value.clone()))
    }

    /// A call whose producer always fails with `error`.
    ///
    /// ```rust
    /// use monadic::control::Call;
    ///
    /// let call = Call::<i32>::error(std::fmt::Error);
    /// assert!(call.to_try().is_failure());
    /// assert!(call.to_try().is_failure());
    /// ```
    pub fn error(error: impl Into<Error>) -> Self {
        let error = error.into();
        Self::from_supplier(move || Err(error.clone()))
    }

    fn from_supplier<F>(supplier: F) -> Self
    where
        F: Fn() -> Result<T, Error> + Send + Sync + 'static,
    {
        Self {
            supplier: Arc::new(supplier),
        }
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Composes a transformation; nothing runs until the call is evaluated.
    pub fn map<B, F>(self, function: F) -> Call<B>
    where
        F: Fn(T) -> B + Send + Sync + 'static,
        B: 'static,
    {
        let upstream = self.supplier;
        Call::from_supplier(move || upstream().map(&function))
    }

    /// Composes a dependent call; both run on every evaluation.
    pub fn flat_map<B, F>(self, function: F) -> Call<B>
    where
        F: Fn(T) -> Call<B> + Send + Sync + 'static,
        B: 'static,
    {
        let upstream = self.supplier;
        Call::from_supplier(move || upstream().and_then(|value| (function(value).supplier)()))
    }

    /// Fails with [`MonadError::CriteriaNotMet`] when `predicate` rejects the value.
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let upstream = self.supplier;
        Self::from_supplier(move || {
            let value = upstream()?;
            if predicate(&value) {
                Ok(value)
            } else {
                Err(Error::from(MonadError::CriteriaNotMet))
            }
        })
    }

    /// Composes a side effect that runs on every evaluation.
    pub fn then<F>(self, consumer: F) -> Call<()>
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.map(consumer)
    }

    /// Joins with another call; `self` runs first, `other` only if it succeeded.
    pub fn and<U, C, F>(self, other: Call<U>, joiner: F) -> Call<C>
    where
        U: 'static,
        C: 'static,
        F: Fn(T, U) -> C + Send + Sync + 'static,
    {
        let left = self.supplier;
        let right = other.supplier;
        Call::from_supplier(move || {
            let left_value = left()?;
            let right_value = right()?;
            Ok(joiner(left_value, right_value))
        })
    }

    // =========================================================================
    // Evaluation
    // =========================================================================

    /// Runs the producer and captures the outcome, panics included.
    pub fn to_try(&self) -> Try<T> {
        Try::of(|| (self.supplier)())
    }

    /// Runs the producer; returns `default` on failure.
    pub fn or_use(&self, default: T) -> T {
        self.to_try().or_use(default)
    }

    /// Runs the producer.
    ///
    /// # Errors
    ///
    /// Returns the error raised by this run of the producer.
    pub fn or_fail(&self) -> Result<T, Error> {
        self.to_try().or_fail()
    }

    /// Runs the producer, remapping a failure with `mapper`.
    ///
    /// # Errors
    ///
    /// Returns `mapper(error)` if this run failed.
    pub fn or_throw<E, M>(&self, mapper: M) -> Result<T, E>
    where
        M: FnOnce(Error) -> E,
    {
        self.to_try().or_throw(mapper)
    }

    /// Runs the producer, handing a failure to `handler`.
    pub fn or_else<H>(&self, handler: H) -> Option<T>
    where
        H: FnOnce(&Error),
    {
        self.to_try().or_else(handler)
    }

    // =========================================================================
    // Combinators
    // =========================================================================

    /// One call that runs every constituent in order and collects the values.
    ///
    /// Evaluation stops at the first failing constituent. Re-evaluating the
    /// combined call re-runs every constituent.
    ///
    /// ```rust
    /// use monadic::control::Call;
    ///
    /// let all = Call::of_all(vec![Call::pure(1), Call::pure(2), Call::pure(3)]);
    /// assert_eq!(all.or_fail().ok(), Some(vec![1, 2, 3]));
    /// ```
    pub fn of_all<I>(calls: I) -> Call<Vec<T>>
    where
        I: IntoIterator<Item = Self>,
    {
        let calls: Vec<Self> = calls.into_iter().collect();
        Call::from_supplier(move || calls.iter().map(|call| (call.supplier)()).collect())
    }
}

#[cfg(feature = "async")]
impl<T> Call<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Evaluates the call once on the worker runtime.
    ///
    /// ```rust
    /// use monadic::control::Call;
    ///
    /// let promise = Call::pure(7).map(|n| n * 6).spawn();
    /// assert_eq!(promise.or_fail().ok(), Some(42));
    /// ```
    pub fn spawn(&self) -> crate::effect::Promise<T> {
        let call = self.clone();
        crate::effect::Promise::spawn(move || call.or_fail())
    }
}

impl<T> Clone for Call<T> {
    fn clone(&self) -> Self {
        Self {
            supplier: Arc::clone(&self.supplier),
        }
    }
}

impl<T> PartialEq for Call<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.supplier, &other.supplier)
    }
}

impl<T> Eq for Call<T> {}

impl<T> fmt::Debug for Call<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Call")
            .field("supplier", &Arc::as_ptr(&self.supplier).cast::<()>())
            .finish()
    }
}

// =============================================================================
// Type Class Implementations
// =============================================================================

impl<T> TypeConstructor for Call<T> {
    type Inner = T;
    type WithType<B> = Call<B>;
}

impl<T: 'static> Functor for Call<T> {
    #[inline]
    fn fmap<B, F>(self, function: F) -> Call<B>
    where
        F: Fn(T) -> B + Send + Sync + 'static,
        B: Clone + Send + Sync + 'static,
    {
        self.map(function)
    }
}

impl<T> Monad for Call<T>
where
    T: Clone + Send + Sync + 'static,
{
    #[inline]
    fn pure(value: T) -> Self {
        Self::pure(value)
    }

    #[inline]
    fn flat_map<B, F>(self, function: F) -> Call<B>
    where
        F: Fn(T) -> Call<B> + Send + Sync + 'static,
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

    fn counting(value: i32) -> (Call<i32>, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let call = Call::of(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Error>(value)
        });
        (call, runs)
    }

    #[rstest]
    fn construction_does_not_run_the_producer() {
        let (_call, runs) = counting(1);
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    fn every_terminal_operation_reruns_the_producer() {
        let (call, runs) = counting(5);
        assert_eq!(call.or_fail().ok(), Some(5));
        assert_eq!(call.or_use(0), 5);
        assert_eq!(call.or_throw(|error| error.to_string()), Ok(5));
        assert_eq!(call.or_else(|_| ()), Some(5));
        assert!(call.to_try().is_success());
        assert_eq!(runs.load(Ordering::SeqCst), 5);
    }

    #[rstest]
    fn mapped_call_reruns_the_upstream_chain() {
        let (call, runs) = counting(2);
        let mapped = call.map(|n| n + 1).map(|n| n * 3);
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert_eq!(mapped.or_fail().ok(), Some(9));
        assert_eq!(mapped.or_fail().ok(), Some(9));
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[rstest]
    fn error_call_fails_every_time() {
        let call = Call::<i32>::error(io::Error::other("offline"));
        for _ in 0..2 {
            let error = call.or_fail().unwrap_err();
            assert!(error.is::<io::Error>());
        }
    }

    #[rstest]
    fn failing_upstream_skips_mapping() {
        let mapped_runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&mapped_runs);
        let call = Call::<i32>::error(io::Error::other("offline")).map(move |n| {
            counter.fetch_add(1, Ordering::SeqCst);
            n
        });
        assert!(call.to_try().is_failure());
        assert_eq!(mapped_runs.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    fn panicking_mapping_becomes_failure() {
        let call = Call::pure(1).map(|_: i32| -> i32 { panic!("mapping exploded") });
        assert!(call.to_try().error().is_some_and(Error::is_panic));
    }

    #[rstest]
    #[case(3, true)]
    #[case(-3, false)]
    fn filter_is_reapplied_per_evaluation(#[case] value: i32, #[case] kept: bool) {
        let call = Call::pure(value).filter(|n| *n > 0);
        assert_eq!(call.to_try().is_success(), kept);
    }

    #[rstest]
    fn and_runs_left_before_right() {
        let order = Arc::new(ordering_log::Log::default());
        let left_log = Arc::clone(&order);
        let right_log = Arc::clone(&order);
        let left = Call::of(move || {
            left_log.push("left");
            Ok::<_, Error>(2)
        });
        let right = Call::of(move || {
            right_log.push("right");
            Ok::<_, Error>(3)
        });
        assert_eq!(left.and(right, |a, b| a * b).or_fail().ok(), Some(6));
        assert_eq!(order.entries(), vec!["left", "right"]);
    }

    #[rstest]
    fn of_all_reruns_every_constituent() {
        let (first, first_runs) = counting(1);
        let (second, second_runs) = counting(2);
        let all = Call::of_all(vec![first, second]);
        assert_eq!(all.or_fail().ok(), Some(vec![1, 2]));
        assert_eq!(all.or_fail().ok(), Some(vec![1, 2]));
        assert_eq!(first_runs.load(Ordering::SeqCst), 2);
        assert_eq!(second_runs.load(Ordering::SeqCst), 2);
    }

    #[rstest]
    fn of_all_stops_at_first_failure() {
        let (tail, tail_runs) = counting(3);
        let all = Call::of_all(vec![Call::pure(1), Call::error(io::Error::other("x")), tail]);
        assert!(all.to_try().is_failure());
        assert_eq!(tail_runs.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    fn equality_is_identity_of_the_producer() {
        let call = Call::pure(1);
        let same = call.clone();
        let other = Call::pure(1);
        assert_eq!(call, same);
        assert_ne!(call, other);
    }

    mod ordering_log {
        use std::sync::Mutex;

        #[derive(Default)]
        pub struct Log(Mutex<Vec<&'static str>>);

        impl Log {
            pub fn push(&self, entry: &'static str) {
                self.0.lock().unwrap().push(entry);
            }

            pub fn entries(&self) -> Vec<&'static str> {
                self.0.lock().unwrap().clone()
            }
        }
    }
}
