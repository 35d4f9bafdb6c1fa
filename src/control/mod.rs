//! Synchronous wrappers that run entirely on the calling thread.
//!
//! - [`Maybe`]: an optional value; absence carries no cause
//! - [`Try`]: the eagerly captured success or failure of a computation
//! - [`Call`]: a deferred computation re-run on every evaluation
//!
//! All three share the `map`/`flat_map`/`then`/`and` vocabulary and the
//! `or_use`/`or_fail`/`or_throw`/`or_else` terminal operations.
//!
//! # Examples
//!
//! ```rust
//! use monadic::control::{Call, Maybe, Try};
//!
//! let configured = Maybe::of(std::env::var("MONADIC_DOC_PORT").ok());
//! let port = configured
//!     .to_try()
//!     .try_map(|text| text.parse::<u16>())
//!     .or_use(8080);
//! assert_eq!(port, 8080);
//!
//! let lookup = Call::pure(2).map(|n| n * 21);
//! assert_eq!(lookup.or_fail().ok(), Some(42));
//! assert_eq!(Try::success(1).and(Try::success(2), |a, b| a + b).ok(), Some(3));
//! ```

mod attempt;
mod call;
mod maybe;

pub use attempt::Try;
pub use call::Call;
pub use maybe::Maybe;
