//! Try type - the eagerly evaluated result of a computation that may fail.
//!
//! `Try<T>` is either `Success(T)` or `Failure(Error)`. [`Try::of`] runs its
//! producer immediately; an `Err` return and a panic are both captured as
//! `Failure`, so the original error object is never lost.
//!
//! Unlike [`Maybe`](super::Maybe), a failing `Try` knows why it failed, and
//! transformations applied to a `Success` are themselves guarded: a `map`
//! closure that panics turns the `Success` into a `Failure`.
//!
//! # Examples
//!
//! ```rust
//! use monadic::control::Try;
//!
//! let parsed = Try::of(|| "42".parse::<i32>()).map(|n| n * 2);
//! assert_eq!(parsed.ok(), Some(84));
//!
//! let failed = Try::of(|| "forty-two".parse::<i32>());
//! assert!(failed.is_failure());
//! assert_eq!(failed.or_use(0), 0);
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::error::{Error, MonadError};
use crate::typeclass::{Functor, Monad, TypeConstructor};

use super::Maybe;

/// The outcome of an eagerly evaluated computation.
///
/// Two failures compare equal only when they share the same error object,
/// which is what forwarding a failure through `map`/`flat_map` preserves.
#[derive(Debug, Clone)]
pub enum Try<T> {
    /// The computation produced a value.
    Success(T),
    /// The computation failed with the captured error.
    Failure(Error),
}

impl<T> Try<T> {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Runs `supplier` now and captures its outcome.
    ///
    /// ```rust
    /// use monadic::control::Try;
    ///
    /// assert!(Try::of(|| Ok::<_, std::io::Error>(42)).is_success());
    ///
    /// let panicked = Try::<i32>::of(|| -> Result<i32, std::io::Error> { panic!("boom") });
    /// assert!(panicked.error().is_some_and(|error| error.is_panic()));
    /// ```
    pub fn of<E, F>(supplier: F) -> Self
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<Error>,
    {
        match catch_unwind(AssertUnwindSafe(supplier)) {
            Ok(Ok(value)) => Self::Success(value),
            Ok(Err(error)) => Self::Failure(error.into()),
            Err(payload) => {
                let error = Error::from_panic(payload);
                tracing::debug!(%error, "captured panic while evaluating a Try");
                Self::Failure(error)
            }
        }
    }

    /// Wraps a value as a success.
    #[inline]
    pub const fn success(value: T) -> Self {
        Self::Success(value)
    }

    /// Wraps an error as a failure.
    #[inline]
    pub fn failure(error: impl Into<Error>) -> Self {
        Self::Failure(error.into())
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Returns `true` for `Success`.
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns `true` for `Failure`.
    #[inline]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Borrows the captured error, if any.
    #[inline]
    pub const fn error(&self) -> Option<&Error> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }

    /// Borrows the value, if any.
    #[inline]
    pub fn as_ref(&self) -> Try<&T> {
        match self {
            Self::Success(value) => Try::Success(value),
            Self::Failure(error) => Try::Failure(error.clone()),
        }
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Transforms a success; a panic inside `function` becomes a failure.
    ///
    /// ```rust
    /// use monadic::control::Try;
    ///
    /// let guarded = Try::success(1).map(|_: i32| -> i32 { panic!("bad mapping") });
    /// assert!(guarded.is_failure());
    /// ```
    pub fn map<B, F>(self, function: F) -> Try<B>
    where
        F: FnOnce(T) -> B,
    {
        match self {
            Self::Success(value) => Try::of(|| Ok::<B, Error>(function(value))),
            Self::Failure(error) => Try::Failure(error),
        }
    }

    /// Transforms a success with a fallible function.
    pub fn try_map<B, E, F>(self, function: F) -> Try<B>
    where
        F: FnOnce(T) -> Result<B, E>,
        E: Into<Error>,
    {
        match self {
            Self::Success(value) => Try::of(|| function(value)),
            Self::Failure(error) => Try::Failure(error),
        }
    }

    /// Chains a computation returning another `Try`.
    ///
    /// The returned `Try` is passed through as is; only a panic escaping
    /// `function` is converted into a failure.
    pub fn flat_map<B, F>(self, function: F) -> Try<B>
    where
        F: FnOnce(T) -> Try<B>,
    {
        match self {
            Self::Success(value) => match catch_unwind(AssertUnwindSafe(|| function(value))) {
                Ok(next) => next,
                Err(payload) => Try::Failure(Error::from_panic(payload)),
            },
            Self::Failure(error) => Try::Failure(error),
        }
    }

    /// Fails with [`MonadError::CriteriaNotMet`] if `predicate` rejects the value.
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: FnOnce(&T) -> bool,
    {
        match self {
            Self::Success(value) if predicate(&value) => Self::Success(value),
            Self::Success(_) => Self::Failure(Error::from(MonadError::CriteriaNotMet)),
            Self::Failure(error) => Self::Failure(error),
        }
    }

    /// Runs `consumer` on a success.
    #[inline]
    pub fn then<F>(self, consumer: F) -> Try<()>
    where
        F: FnOnce(T),
    {
        self.map(consumer)
    }

    /// Joins two successes; the first failure encountered wins.
    #[inline]
    pub fn and<U, C, F>(self, other: Try<U>, joiner: F) -> Try<C>
    where
        F: FnOnce(T, U) -> C,
    {
        self.flat_map(|left| other.map(|right| joiner(left, right)))
    }

    /// Replaces a failure with a value computed from its error.
    ///
    /// ```rust
    /// use monadic::control::Try;
    ///
    /// let recovered = Try::<usize>::failure(std::fmt::Error).recover(|error| error.to_string().len());
    /// assert!(recovered.is_success());
    /// ```
    pub fn recover<F>(self, function: F) -> Self
    where
        F: FnOnce(Error) -> T,
    {
        match self {
            Self::Success(value) => Self::Success(value),
            Self::Failure(error) => Self::of(|| Ok::<T, Error>(function(error))),
        }
    }

    // =========================================================================
    // Terminal Operations
    // =========================================================================

    /// Returns the value or `default`.
    #[inline]
    pub fn or_use(self, default: T) -> T {
        match self {
            Self::Success(value) => value,
            Self::Failure(_) => default,
        }
    }

    /// Returns the value or computes one from the error.
    #[inline]
    pub fn or_use_with<F>(self, default: F) -> T
    where
        F: FnOnce(Error) -> T,
    {
        match self {
            Self::Success(value) => value,
            Self::Failure(error) => default(error),
        }
    }

    /// Returns the value.
    ///
    /// # Errors
    ///
    /// Returns the captured error unchanged.
    #[inline]
    pub fn or_fail(self) -> Result<T, Error> {
        self.into_result()
    }

    /// Returns the value, remapping the captured error first.
    ///
    /// # Errors
    ///
    /// Returns `mapper(error)` on failure.
    ///
    /// ```rust
    /// use monadic::control::Try;
    ///
    /// let result = Try::<i32>::failure(std::fmt::Error).or_throw(|error| format!("wrapped: {error}"));
    /// assert_eq!(result, Err("wrapped: an error occurred when formatting an argument".to_string()));
    /// ```
    #[inline]
    pub fn or_throw<E, M>(self, mapper: M) -> Result<T, E>
    where
        M: FnOnce(Error) -> E,
    {
        self.into_result().map_err(mapper)
    }

    /// Invokes `handler` with the error on failure; hands back the value otherwise.
    #[inline]
    pub fn or_else<H>(self, handler: H) -> Option<T>
    where
        H: FnOnce(&Error),
    {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(error) => {
                handler(&error);
                None
            }
        }
    }

    /// Discards the error.
    #[inline]
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Discards the error, keeping only presence.
    #[inline]
    pub fn to_maybe(self) -> Maybe<T> {
        Maybe::of(self.ok())
    }

    /// Converts into a standard `Result`.
    ///
    /// # Errors
    ///
    /// Returns the captured error on failure.
    #[inline]
    pub fn into_result(self) -> Result<T, Error> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(error) => Err(error),
        }
    }

    // =========================================================================
    // Combinators
    // =========================================================================

    /// Collects every value, or reports the first failure in iteration order.
    ///
    /// ```rust
    /// use monadic::control::Try;
    ///
    /// let all = Try::of_all(vec![Try::success(1), Try::success(2)]);
    /// assert_eq!(all.ok(), Some(vec![1, 2]));
    ///
    /// let first_failure = Try::of_all(vec![
    ///     Try::success(1),
    ///     Try::failure(std::fmt::Error),
    ///     Try::success(3),
    /// ]);
    /// assert!(first_failure.is_failure());
    /// ```
    pub fn of_all<I>(tries: I) -> Try<Vec<T>>
    where
        I: IntoIterator<Item = Self>,
    {
        tries
            .into_iter()
            .map(Self::into_result)
            .collect::<Result<Vec<T>, Error>>()
            .into()
    }

    /// Lazily keeps only the successful values, discarding failures.
    ///
    /// ```rust
    /// use monadic::control::Try;
    ///
    /// let inputs = ["1", "x", "3"];
    /// let numbers = Try::of_successful(inputs.iter().map(|text| Try::of(|| text.parse::<i32>())));
    /// assert_eq!(numbers.map(|values| values.sum::<i32>()).ok(), Some(4));
    /// ```
    pub fn of_successful<I>(tries: I) -> Try<impl Iterator<Item = T>>
    where
        I: IntoIterator<Item = Self>,
    {
        Try::of(|| Ok::<_, Error>(tries.into_iter().filter_map(Self::ok)))
    }
}

impl<T: PartialEq> PartialEq for Try<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Success(left), Self::Success(right)) => left == right,
            (Self::Failure(left), Self::Failure(right)) => left.ptr_eq(right),
            _ => false,
        }
    }
}

impl<T, E> From<Result<T, E>> for Try<T>
where
    E: Into<Error>,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error.into()),
        }
    }
}

// =============================================================================
// Type Class Implementations
// =============================================================================

impl<T> TypeConstructor for Try<T> {
    type Inner = T;
    type WithType<B> = Try<B>;
}

impl<T> Functor for Try<T> {
    #[inline]
    fn fmap<B, F>(self, function: F) -> Try<B>
    where
        F: Fn(T) -> B,
    {
        self.map(function)
    }
}

impl<T> Monad for Try<T> {
    #[inline]
    fn pure(value: T) -> Self {
        Self::Success(value)
    }

    #[inline]
    fn flat_map<B, F>(self, function: F) -> Try<B>
    where
        F: Fn(T) -> Try<B>,
    {
        Self::flat_map(self, function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::Cell;
    use std::io;

    fn io_failure() -> Error {
        Error::from(io::Error::other("disk unavailable"))
    }

    #[rstest]
    fn of_captures_success() {
        assert_eq!(Try::of(|| Ok::<_, Error>(42)), Try::Success(42));
    }

    #[rstest]
    fn of_captures_returned_error_without_losing_it() {
        let attempt = Try::<i32>::of(|| Err(io::Error::other("disk unavailable")));
        let error = attempt.error().expect("failure expected");
        assert!(error.is::<io::Error>());
        assert_eq!(error.to_string(), "disk unavailable");
    }

    #[rstest]
    fn of_captures_panics() {
        let attempt = Try::<i32>::of(|| -> Result<i32, Error> { panic!("exploded") });
        assert!(attempt.error().is_some_and(Error::is_panic));
    }

    #[rstest]
    fn map_forwards_the_same_failure() {
        let error = io_failure();
        let mapped = Try::<i32>::Failure(error.clone()).map(|n| n + 1);
        assert!(mapped.error().is_some_and(|mapped| mapped.ptr_eq(&error)));
    }

    #[rstest]
    fn map_is_not_invoked_on_failure() {
        let calls = Cell::new(0);
        let _ = Try::<i32>::failure(io::Error::other("x")).map(|n| {
            calls.set(calls.get() + 1);
            n
        });
        assert_eq!(calls.get(), 0);
    }

    #[rstest]
    fn try_map_converts_errors() {
        let converted = Try::success("12x").try_map(|text| text.parse::<i32>());
        assert!(converted.error().is_some_and(|error| error.is::<std::num::ParseIntError>()));
    }

    #[rstest]
    fn flat_map_returns_inner_result_directly() {
        let error = io_failure();
        let inner_error = error.clone();
        let chained = Try::success(1).flat_map(move |_| Try::<i32>::Failure(inner_error));
        assert!(chained.error().is_some_and(|chained| chained.ptr_eq(&error)));
    }

    #[rstest]
    #[case(10, true)]
    #[case(-1, false)]
    fn filter_reports_unmet_criteria(#[case] value: i32, #[case] kept: bool) {
        let filtered = Try::success(value).filter(|n| *n > 0);
        assert_eq!(filtered.is_success(), kept);
        if !kept {
            assert_eq!(
                filtered.error().and_then(Error::kind),
                Some(&MonadError::CriteriaNotMet)
            );
        }
    }

    #[rstest]
    fn and_reports_the_left_failure_first() {
        let left_error = io_failure();
        let right_error = io_failure();
        let joined = Try::<i32>::Failure(left_error.clone())
            .and(Try::<i32>::Failure(right_error), |a, b| a + b);
        assert!(joined.error().is_some_and(|error| error.ptr_eq(&left_error)));
    }

    #[rstest]
    fn or_else_only_runs_on_failure() {
        let handled = Cell::new(false);
        assert_eq!(Try::success(1).or_else(|_| handled.set(true)), Some(1));
        assert!(!handled.get());
        assert_eq!(Try::<i32>::Failure(io_failure()).or_else(|_| handled.set(true)), None);
        assert!(handled.get());
    }

    #[rstest]
    fn or_fail_rethrows_the_captured_error() {
        let error = io_failure();
        let rethrown = Try::<i32>::Failure(error.clone()).or_fail().unwrap_err();
        assert!(rethrown.ptr_eq(&error));
    }

    #[rstest]
    fn of_all_reports_first_failure_in_order() {
        let first = io_failure();
        let second = io_failure();
        let all = Try::of_all(vec![
            Try::success(1),
            Try::Failure(first.clone()),
            Try::Failure(second),
            Try::success(4),
        ]);
        assert!(all.error().is_some_and(|error| error.ptr_eq(&first)));
    }

    #[rstest]
    fn of_all_of_nothing_is_empty_success() {
        assert_eq!(Try::<i32>::of_all(Vec::new()), Try::Success(Vec::new()));
    }

    #[rstest]
    fn of_successful_is_lazy() {
        let produced = Cell::new(0);
        let source = (1..=4).map(|n| {
            produced.set(produced.get() + 1);
            if n % 2 == 0 {
                Try::success(n)
            } else {
                Try::failure(io::Error::other("odd"))
            }
        });
        let evens = Try::of_successful(source).or_fail().expect("sequence is built");
        assert_eq!(produced.get(), 0);
        assert_eq!(evens.collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(produced.get(), 4);
    }

    #[rstest]
    fn recover_replaces_failures_only() {
        assert_eq!(Try::success(1).recover(|_| 0), Try::Success(1));
        assert_eq!(Try::<i32>::Failure(io_failure()).recover(|_| 0), Try::Success(0));
    }
}
