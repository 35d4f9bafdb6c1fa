//! # monadic
//!
//! Four wrappers that share one `map`/`flat_map` vocabulary:
//!
//! - [`Maybe`](control::Maybe): a value that may be absent
//! - [`Try`](control::Try): the captured success or failure of a computation
//! - [`Call`](control::Call): a deferred computation re-run on every evaluation
//! - [`Promise`](effect::Promise): a value settling later on a worker runtime
//!
//! Every failure is carried as an [`Error`], which keeps the original error
//! object so callers can downcast it back.
//!
//! ## Feature Flags
//!
//! - `typeclass`: the `TypeConstructor`, `Functor` and `Monad` traits
//! - `control`: `Maybe`, `Try` and `Call`
//! - `async`: `Promise` and the worker runtime (tokio)
//! - `serde`: serialization for `Maybe` and `PromiseState`
//! - `full`: everything above
//!
//! ## Example
//!
//! ```rust
//! use monadic::prelude::*;
//!
//! let port = Maybe::of(Some("8080"))
//!     .to_try()
//!     .try_map(|text| text.parse::<u16>())
//!     .filter(|port| *port > 1024);
//! assert_eq!(port.or_use(80), 8080);
//!
//! let doubled = Promise::spawn(|| Ok::<_, Error>(21)).map(|n| n * 2);
//! assert_eq!(doubled.or_fail().ok(), Some(42));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// ```rust
/// use monadic::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, MonadError};

    #[cfg(feature = "typeclass")]
    pub use crate::typeclass::*;

    #[cfg(feature = "control")]
    pub use crate::control::*;

    #[cfg(feature = "async")]
    pub use crate::effect::{Promise, PromiseHandle, PromiseState, TimeUnit};
}

pub mod error;

pub use error::{Error, MonadError};

#[cfg(feature = "typeclass")]
pub mod typeclass;

#[cfg(feature = "control")]
pub mod control;

#[cfg(feature = "async")]
pub mod effect;
