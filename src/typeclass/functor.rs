//! Functor type class - mapping over wrapped values.
//!
//! A `Functor` transforms the value inside a wrapper without changing the
//! wrapper's shape: an absent `Maybe` stays absent, a failed `Try` stays
//! failed, a pending `Promise` stays pending until its source settles.
//!
//! # Laws
//!
//! ## Identity Law
//!
//! ```text
//! fa.fmap(|x| x) == fa
//! ```
//!
//! ## Composition Law
//!
//! ```text
//! fa.fmap(f).fmap(g) == fa.fmap(|x| g(f(x)))
//! ```
//!
//! # Examples
//!
//! ```rust
//! use monadic::control::Maybe;
//! use monadic::typeclass::Functor;
//!
//! let length = Maybe::some("hello".to_string()).fmap(|text| text.len());
//! assert_eq!(length, Maybe::some(5));
//!
//! let absent: Maybe<String> = Maybe::none();
//! assert_eq!(absent.fmap(|text| text.len()), Maybe::none());
//! ```

use super::higher::TypeConstructor;

/// A type class for wrappers whose contents can be transformed.
///
/// The mapping function is `Fn` rather than `FnOnce`: a `Call` re-runs its
/// whole chain, mapping included, every time it is evaluated. It must also be
/// `Send + Sync + 'static` because a `Promise` applies it on a worker thread
/// once its source settles.
///
/// Concrete types expose inherent `map` methods with looser bounds; this
/// trait is the common vocabulary for generic code.
pub trait Functor: TypeConstructor {
    /// Applies a function to the wrapped value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use monadic::control::Try;
    /// use monadic::typeclass::Functor;
    ///
    /// let doubled = Try::success(21).fmap(|n| n * 2);
    /// assert_eq!(doubled.ok(), Some(42));
    /// ```
    fn fmap<B, F>(self, function: F) -> Self::WithType<B>
    where
        F: Fn(Self::Inner) -> B + Send + Sync + 'static,
        B: Clone + Send + Sync + 'static;

    /// Replaces the wrapped value with a constant.
    #[inline]
    fn replace<B>(self, value: B) -> Self::WithType<B>
    where
        Self: Sized,
        B: Clone + Send + Sync + 'static,
    {
        self.fmap(move |_| value.clone())
    }

    /// Discards the wrapped value, keeping only the shape.
    ///
    /// ```rust
    /// use monadic::control::Maybe;
    /// use monadic::typeclass::Functor;
    ///
    /// assert_eq!(Maybe::some(5).void(), Maybe::some(()));
    /// assert_eq!(Maybe::<i32>::none().void(), Maybe::none());
    /// ```
    #[inline]
    fn void(self) -> Self::WithType<()>
    where
        Self: Sized,
    {
        self.replace(())
    }
}
