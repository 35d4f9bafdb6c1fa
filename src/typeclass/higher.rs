//! Higher-Kinded Type emulation through Generic Associated Types.
//!
//! Rust cannot abstract over `Maybe<_>` or `Promise<_>` as type constructors
//! directly. [`TypeConstructor`] uses a generic associated type to name "the
//! same wrapper applied to another type", which is what [`Functor`] and
//! [`Monad`] need to describe their return types.
//!
//! [`Functor`]: super::Functor
//! [`Monad`]: super::Monad
//!
//! # Example
//!
//! ```rust
//! use monadic::control::Maybe;
//! use monadic::typeclass::TypeConstructor;
//!
//! fn absent_like<T: TypeConstructor>(_value: T) -> T::WithType<String>
//! where
//!     T::WithType<String>: Default,
//! {
//!     Default::default()
//! }
//!
//! let absent: Maybe<String> = absent_like(Maybe::some(42));
//! assert!(!absent.exists());
//! ```

/// A trait representing a type constructor.
///
/// # Associated Types
///
/// - `Inner`: The type parameter that this type constructor is currently applied to.
/// - `WithType<B>`: The same type constructor applied to a different type `B`.
///
/// # Laws
///
/// `<F as TypeConstructor>::WithType<F::Inner>` should be `F` itself.
pub trait TypeConstructor {
    /// The inner type that this type constructor is applied to.
    ///
    /// For example, for `Try<i32>`, this would be `i32`.
    type Inner;

    /// The same type constructor applied to a different type `B`.
    ///
    /// For example, for `Try<i32>`, `WithType<String>` would be `Try<String>`.
    type WithType<B>: TypeConstructor<Inner = B>;
}

#[cfg(all(test, feature = "control"))]
mod tests {
    use super::*;
    use crate::control::{Call, Maybe, Try};

    #[test]
    fn maybe_inner_type_is_correct() {
        fn assert_inner<T: TypeConstructor<Inner = i32>>() {}
        assert_inner::<Maybe<i32>>();
    }

    #[test]
    fn try_with_type_produces_try() {
        fn assert_with_type<T, B>()
        where
            Try<T>: TypeConstructor<Inner = T, WithType<B> = Try<B>>,
        {
        }

        assert_with_type::<i32, String>();
        assert_with_type::<Vec<u8>, bool>();
    }

    #[test]
    fn call_with_type_produces_call() {
        fn assert_with_type<T, B>()
        where
            Call<T>: TypeConstructor<Inner = T, WithType<B> = Call<B>>,
        {
        }

        assert_with_type::<i32, String>();
    }

    #[test]
    fn chained_with_type_transformations() {
        type Step1 = <Maybe<i32> as TypeConstructor>::WithType<String>;
        type Step2 = <Step1 as TypeConstructor>::WithType<bool>;

        fn assert_is_bool_inner<T: TypeConstructor<Inner = bool>>() {}
        assert_is_bool_inner::<Step2>();
    }

    #[cfg(feature = "async")]
    #[test]
    fn promise_with_type_produces_promise() {
        use crate::effect::Promise;

        fn assert_with_type<T, B>()
        where
            Promise<T>: TypeConstructor<Inner = T, WithType<B> = Promise<B>>,
        {
        }

        assert_with_type::<i32, String>();
    }
}
