//! Monad type class - sequencing computations within a wrapper.
//!
//! `flat_map` is the primitive every wrapper in this crate implements. The
//! rest of the vocabulary is derived from it:
//!
//! - `fmap(f)` behaves like `flat_map(|t| pure(f(t)))`
//! - `then(consumer)` runs a side effect and yields a wrapper of `()`
//! - `and(other, joiner)` evaluates `self`, then `other`, and joins both
//!   values only if both are present
//!
//! When the source is absent, failed or settles unsuccessfully, the function
//! passed to `flat_map` is never invoked and the failure propagates as is.
//!
//! # Laws
//!
//! ## Left Identity Law
//!
//! ```text
//! Self::pure(a).flat_map(f) == f(a)
//! ```
//!
//! ## Right Identity Law
//!
//! ```text
//! m.flat_map(Self::pure) == m
//! ```
//!
//! ## Associativity Law
//!
//! ```text
//! m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))
//! ```
//!
//! # Examples
//!
//! ```rust
//! use monadic::control::Maybe;
//! use monadic::typeclass::Monad;
//!
//! fn half(n: i32) -> Maybe<i32> {
//!     if n % 2 == 0 { Maybe::some(n / 2) } else { Maybe::none() }
//! }
//!
//! assert_eq!(Maybe::some(8).flat_map(half).flat_map(half), Maybe::some(2));
//! assert_eq!(Maybe::some(6).flat_map(half).flat_map(half), Maybe::none());
//! ```

use std::sync::Arc;

use super::functor::Functor;

/// A type class for wrappers that support dependent sequencing.
///
/// # Examples
///
/// ```rust
/// use monadic::control::Try;
/// use monadic::typeclass::Monad;
///
/// let sum = Try::success(2).and(Try::success(3), |left, right| left + right);
/// assert_eq!(sum.ok(), Some(5));
/// ```
pub trait Monad: Functor {
    /// Lifts a plain value into the wrapper.
    fn pure(value: Self::Inner) -> Self;

    /// Applies a function returning a wrapper and flattens the result.
    ///
    /// ```rust
    /// use monadic::control::Maybe;
    /// use monadic::typeclass::Monad;
    ///
    /// let positive = Maybe::some(5).flat_map(|n| if n > 0 { Maybe::some(n) } else { Maybe::none() });
    /// assert_eq!(positive, Maybe::some(5));
    /// ```
    fn flat_map<B, F>(self, function: F) -> Self::WithType<B>
    where
        F: Fn(Self::Inner) -> Self::WithType<B> + Send + Sync + 'static,
        B: Clone + Send + Sync + 'static;

    /// Runs a side effect on the wrapped value and yields a wrapper of `()`.
    #[inline]
    fn then<F>(self, consumer: F) -> Self::WithType<()>
    where
        Self: Sized,
        F: Fn(Self::Inner) + Send + Sync + 'static,
    {
        self.fmap(consumer)
    }

    /// Combines two wrappers of the same family with a binary function.
    ///
    /// The left operand is evaluated first; `joiner` runs only when both
    /// operands produce a value.
    fn and<U, C, F>(self, other: Self::WithType<U>, joiner: F) -> Self::WithType<C>
    where
        Self: Sized,
        Self::Inner: Clone + Send + Sync + 'static,
        Self::WithType<U>:
            Functor<Inner = U, WithType<C> = Self::WithType<C>> + Clone + Send + Sync + 'static,
        U: 'static,
        C: Clone + Send + Sync + 'static,
        F: Fn(Self::Inner, U) -> C + Send + Sync + 'static,
    {
        let joiner = Arc::new(joiner);
        self.flat_map(move |left: Self::Inner| {
            let joiner = Arc::clone(&joiner);
            other
                .clone()
                .fmap(move |right| joiner(left.clone(), right))
        })
    }
}
