//! Asynchronous effects backed by a shared worker runtime.
//!
//! - [`Promise`]: a value that settles at most once, composed without blocking
//! - [`PromiseHandle`]: the cancel/get/poll view returned by [`Promise::to_future`]
//! - [`runtime`]: the global tokio runtime promises run on, and its configuration
//!
//! # Examples
//!
//! ```rust
//! use monadic::effect::Promise;
//!
//! let greeting = Promise::spawn(|| Ok::<_, std::io::Error>("hello"))
//!     .and(Promise::of("world"), |left, right| format!("{left}, {right}"));
//! assert_eq!(greeting.or_use(String::new()), "hello, world");
//! ```

mod promise;
pub mod runtime;

pub use promise::{Promise, PromiseHandle, PromiseState, Settling, TimeUnit};
pub use runtime::{ConfigError, RuntimeConfig};
