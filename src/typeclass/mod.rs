//! Type class traits shared by every wrapper in the crate.
//!
//! - [`TypeConstructor`]: emulates higher-kinded types with a GAT
//! - [`Functor`]: mapping over a wrapped value
//! - [`Monad`]: `pure`, `flat_map` and the derived `then`/`and`
//!
//! `Maybe`, `Try`, `Call` and `Promise` each implement all three, so generic
//! code (and the law tests) can treat them uniformly.
//!
//! # Examples
//!
//! ```rust
//! use monadic::control::{Maybe, Try};
//! use monadic::typeclass::Monad;
//!
//! fn increment<M>(wrapper: M) -> M::WithType<i32>
//! where
//!     M: Monad<Inner = i32>,
//! {
//!     wrapper.fmap(|n| n + 1)
//! }
//!
//! assert_eq!(increment(Maybe::some(1)), Maybe::some(2));
//! assert_eq!(increment(Try::success(1)).ok(), Some(2));
//! ```

mod functor;
mod higher;
mod monad;

pub use functor::Functor;
pub use higher::TypeConstructor;
pub use monad::Monad;
