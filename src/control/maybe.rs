//! Maybe type - an optional value whose absence is a failure without a cause.
//!
//! `Maybe<T>` holds at most one value. Every absent `Maybe` is the same
//! payload-free value ([`Maybe::NONE`]), and absence carries no diagnostic:
//! when a cause matters, use [`Try`](super::Try) instead.
//!
//! Mapping functions run without a surrounding catch. A panicking `map`
//! closure unwinds straight into the caller, since there is no failure slot
//! to redirect it into.
//!
//! # Examples
//!
//! ```rust
//! use monadic::control::Maybe;
//!
//! let port = Maybe::of("8080".parse::<u16>().ok())
//!     .filter(|port| *port >= 1024)
//!     .or_use(3000);
//! assert_eq!(port, 8080);
//!
//! let privileged = Maybe::some(80_u16).filter(|port| *port >= 1024);
//! assert!(!privileged.exists());
//! ```

use crate::error::{Error, MonadError};
use crate::typeclass::{Functor, Monad, TypeConstructor};

use super::Try;

/// An optional value.
///
/// # Invariant
///
/// `exists()` is `true` exactly when a value is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Maybe<T>(Option<T>);

impl<T> Maybe<T> {
    /// The absent value.
    pub const NONE: Self = Self(None);

    // =========================================================================
    // Construction
    // =========================================================================

    /// Returns the absent value.
    ///
    /// ```rust
    /// use monadic::control::Maybe;
    ///
    /// assert_eq!(Maybe::<i32>::none(), Maybe::NONE);
    /// ```
    #[inline]
    pub const fn none() -> Self {
        Self::NONE
    }

    /// Wraps a present value.
    #[inline]
    pub const fn some(value: T) -> Self {
        Self(Some(value))
    }

    /// Wraps an `Option`, mapping `None` to [`Maybe::none`].
    #[inline]
    pub fn of(value: Option<T>) -> Self {
        value.map_or(Self::NONE, Self::some)
    }

    /// Wraps an `Option` that must hold a value.
    ///
    /// # Errors
    ///
    /// Returns [`MonadError::Absent`] when `value` is `None`.
    ///
    /// ```rust
    /// use monadic::control::Maybe;
    /// use monadic::MonadError;
    ///
    /// assert!(Maybe::of_required(Some(1)).is_ok());
    /// let error = Maybe::<i32>::of_required(None).unwrap_err();
    /// assert_eq!(error.kind(), Some(&MonadError::Absent));
    /// ```
    pub fn of_required(value: Option<T>) -> Result<Self, Error> {
        value
            .map(Self::some)
            .ok_or_else(|| Error::from(MonadError::Absent))
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Returns `true` if a value is held.
    #[inline]
    pub const fn exists(&self) -> bool {
        self.0.is_some()
    }

    /// Returns `true` if no value is held.
    #[inline]
    pub const fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// Borrows the held value.
    #[inline]
    pub const fn as_ref(&self) -> Maybe<&T> {
        Maybe(self.0.as_ref())
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Keeps the value only if `predicate` accepts it.
    #[inline]
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: FnOnce(&T) -> bool,
    {
        Self(self.0.filter(predicate))
    }

    /// Transforms the held value. Never invoked on an absent `Maybe`.
    #[inline]
    pub fn map<B, F>(self, function: F) -> Maybe<B>
    where
        F: FnOnce(T) -> B,
    {
        Maybe(self.0.map(function))
    }

    /// Chains a computation that may itself be absent.
    #[inline]
    pub fn flat_map<B, F>(self, function: F) -> Maybe<B>
    where
        F: FnOnce(T) -> Maybe<B>,
    {
        match self.0 {
            Some(value) => function(value),
            None => Maybe::NONE,
        }
    }

    /// Runs `consumer` on the held value.
    ///
    /// ```rust
    /// use monadic::control::Maybe;
    ///
    /// let mut seen = Vec::new();
    /// let done = Maybe::some(3).then(|n| seen.push(n));
    /// assert!(done.exists());
    /// assert_eq!(seen, vec![3]);
    /// ```
    #[inline]
    pub fn then<F>(self, consumer: F) -> Maybe<()>
    where
        F: FnOnce(T),
    {
        self.map(consumer)
    }

    /// Joins two values when both are present.
    ///
    /// ```rust
    /// use monadic::control::Maybe;
    ///
    /// let full_name = Maybe::some("Ada").and(Maybe::some("Lovelace"), |first, last| {
    ///     format!("{first} {last}")
    /// });
    /// assert_eq!(full_name, Maybe::some("Ada Lovelace".to_string()));
    /// assert!(!Maybe::some(1).and(Maybe::<i32>::none(), |a, b| a + b).exists());
    /// ```
    #[inline]
    pub fn and<U, C, F>(self, other: Maybe<U>, joiner: F) -> Maybe<C>
    where
        F: FnOnce(T, U) -> C,
    {
        self.flat_map(|left| other.map(|right| joiner(left, right)))
    }

    // =========================================================================
    // Terminal Operations
    // =========================================================================

    /// Returns the held value or `default`.
    #[inline]
    pub fn or_use(self, default: T) -> T {
        self.0.unwrap_or(default)
    }

    /// Returns the held value or computes a default.
    #[inline]
    pub fn or_use_with<F>(self, default: F) -> T
    where
        F: FnOnce() -> T,
    {
        self.0.unwrap_or_else(default)
    }

    /// Returns the held value, or `error` when absent.
    ///
    /// # Errors
    ///
    /// Returns `error` unchanged if no value is held.
    #[inline]
    pub fn or_throw<E>(self, error: E) -> Result<T, E> {
        self.0.ok_or(error)
    }

    /// Returns the held value.
    ///
    /// # Errors
    ///
    /// Returns [`MonadError::Absent`] if no value is held.
    #[inline]
    pub fn or_fail(self) -> Result<T, Error> {
        self.0.ok_or_else(|| Error::from(MonadError::Absent))
    }

    /// Runs `runnable` only when absent; hands back the value otherwise.
    ///
    /// ```rust
    /// use monadic::control::Maybe;
    ///
    /// let mut fallback_used = false;
    /// assert_eq!(Maybe::<i32>::none().or_else(|| fallback_used = true), None);
    /// assert!(fallback_used);
    /// ```
    #[inline]
    pub fn or_else<F>(self, runnable: F) -> Option<T>
    where
        F: FnOnce(),
    {
        if self.0.is_none() {
            runnable();
        }
        self.0
    }

    /// Unwraps into a standard `Option`.
    #[inline]
    pub fn into_option(self) -> Option<T> {
        self.0
    }

    /// Converts absence into a `Try` failure carrying [`MonadError::Absent`].
    #[inline]
    pub fn to_try(self) -> Try<T> {
        match self.0 {
            Some(value) => Try::Success(value),
            None => Try::Failure(Error::from(MonadError::Absent)),
        }
    }
}

impl<T> Default for Maybe<T> {
    fn default() -> Self {
        Self::NONE
    }
}

impl<T> From<Option<T>> for Maybe<T> {
    fn from(value: Option<T>) -> Self {
        Self(value)
    }
}

impl<T> From<Maybe<T>> for Option<T> {
    fn from(value: Maybe<T>) -> Self {
        value.0
    }
}

impl<T> IntoIterator for Maybe<T> {
    type Item = T;
    type IntoIter = std::option::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// =============================================================================
// Type Class Implementations
// =============================================================================

impl<T> TypeConstructor for Maybe<T> {
    type Inner = T;
    type WithType<B> = Maybe<B>;
}

impl<T> Functor for Maybe<T> {
    #[inline]
    fn fmap<B, F>(self, function: F) -> Maybe<B>
    where
        F: Fn(T) -> B,
    {
        self.map(function)
    }
}

impl<T> Monad for Maybe<T> {
    #[inline]
    fn pure(value: T) -> Self {
        Self::some(value)
    }

    #[inline]
    fn flat_map<B, F>(self, function: F) -> Maybe<B>
    where
        F: Fn(T) -> Maybe<B>,
    {
        Self::flat_map(self, function)
    }
}
