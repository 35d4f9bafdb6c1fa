//! Captured failures shared by `Try`, `Call` and `Promise`.
//!
//! Every failing computation in this crate is reduced to a single [`Error`]
//! value. `Error` keeps the original error object behind an `Arc`, so it can
//! be cloned into every observer of a settled `Promise` and later recovered
//! with [`Error::downcast_ref`].
//!
//! Failures generated by the framework itself (absence, unmet filter
//! criteria, cancellation, timeouts, captured panics) are described by
//! [`MonadError`].
//!
//! # Examples
//!
//! ```rust
//! use monadic::{Error, MonadError};
//!
//! let parse_failure = "x".parse::<i32>().unwrap_err();
//! let error = Error::from(parse_failure);
//! assert!(error.is::<std::num::ParseIntError>());
//!
//! let absent = Error::from(MonadError::Absent);
//! assert_eq!(absent.kind(), Some(&MonadError::Absent));
//! ```

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

/// Failures raised by the monads themselves rather than by user code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MonadError {
    /// A `Maybe` was asked for its value but holds none.
    #[error("value is absent")]
    Absent,

    /// A `filter` predicate rejected the value.
    #[error("criteria not met")]
    CriteriaNotMet,

    /// The promise was cancelled before it settled.
    #[error("promise was cancelled")]
    Cancelled,

    /// A blocking accessor gave up waiting.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The computation panicked; the payload message is preserved.
    #[error("computation panicked: {0}")]
    Panicked(String),

    /// `Promise::of_any` was called without any promise to race.
    #[error("at least one promise is required")]
    NoPromises,
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct Message(String);

/// A captured failure.
///
/// `Error` is cheap to clone and is `Send + Sync`. It deliberately does not
/// implement [`std::error::Error`] itself, which lets any standard error be
/// converted into it with `?`. Use [`Error::as_std`] (or deref) to treat it
/// as a `&dyn std::error::Error`.
#[derive(Clone)]
pub struct Error {
    inner: Arc<dyn StdError + Send + Sync + 'static>,
}

impl Error {
    /// Wraps an arbitrary error.
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(error),
        }
    }

    /// Creates an error carrying only a message.
    ///
    /// ```rust
    /// use monadic::Error;
    ///
    /// let error = Error::msg("disk full");
    /// assert_eq!(error.to_string(), "disk full");
    /// ```
    pub fn msg(message: impl fmt::Display) -> Self {
        Self::new(Message(message.to_string()))
    }

    pub(crate) fn cancelled() -> Self {
        Self::new(MonadError::Cancelled)
    }

    pub(crate) fn timeout(duration: Duration) -> Self {
        Self::new(MonadError::Timeout(duration))
    }

    /// Converts a panic payload caught by `catch_unwind` into an error.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = payload
            .downcast_ref::<&'static str>()
            .map(|text| (*text).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self::new(MonadError::Panicked(message))
    }

    /// Returns `true` if the wrapped error is of type `E`.
    pub fn is<E>(&self) -> bool
    where
        E: StdError + 'static,
    {
        self.inner.is::<E>()
    }

    /// Returns a reference to the wrapped error if it is of type `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        self.inner.downcast_ref::<E>()
    }

    /// Returns the framework failure kind, if this error was produced by the framework.
    pub fn kind(&self) -> Option<&MonadError> {
        self.downcast_ref::<MonadError>()
    }

    /// Returns `true` if this error reports a cancelled promise.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind(), Some(MonadError::Cancelled))
    }

    /// Returns `true` if this error reports an elapsed wait bound.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind(), Some(MonadError::Timeout(_)))
    }

    /// Returns `true` if this error was produced by a captured panic.
    pub fn is_panic(&self) -> bool {
        matches!(self.kind(), Some(MonadError::Panicked(_)))
    }

    /// Views the error as a standard error trait object.
    pub fn as_std(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.inner
    }

    /// Returns `true` if both handles share the same underlying error object.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

static_assertions::assert_impl_all!(Error: Send, Sync, Clone);
static_assertions::assert_not_impl_any!(Error: StdError);

impl<E> From<E> for Error
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self::new(error)
    }
}

impl Deref for Error {
    type Target = dyn StdError + Send + Sync + 'static;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl AsRef<dyn StdError + Send + Sync + 'static> for Error {
    fn as_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.inner
    }
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner, formatter)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, formatter)
    }
}
