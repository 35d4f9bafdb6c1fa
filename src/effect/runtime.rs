//! The worker runtime on which `Promise` work runs.
//!
//! Promise producers are submitted to a single global multi-thread tokio
//! runtime. It is built lazily on first use and never dropped.
//!
//! # Configuration
//!
//! The runtime is built from, in order of precedence:
//!
//! 1. a [`RuntimeConfig`] installed with [`configure`] before first use,
//! 2. the `MONADIC_WORKER_THREADS`, `MONADIC_MAX_BLOCKING_THREADS` and
//!    `MONADIC_THREAD_NAME` environment variables ([`RuntimeConfig::from_env`]),
//! 3. [`RuntimeConfig::default`].
//!
//! # Examples
//!
//! ```rust
//! use monadic::effect::runtime::{self, RuntimeConfig};
//!
//! let config = RuntimeConfig::default().with_worker_threads(2);
//! // Fails once the runtime has already been built by an earlier promise.
//! let _ = runtime::configure(config);
//!
//! let answer = runtime::global().block_on(async { 42 });
//! assert_eq!(answer, 42);
//! ```

use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;

/// Environment variable overriding the number of worker threads.
pub const WORKER_THREADS_VARIABLE: &str = "MONADIC_WORKER_THREADS";
/// Environment variable overriding the blocking thread pool limit.
pub const MAX_BLOCKING_THREADS_VARIABLE: &str = "MONADIC_MAX_BLOCKING_THREADS";
/// Environment variable overriding the worker thread name.
pub const THREAD_NAME_VARIABLE: &str = "MONADIC_THREAD_NAME";

const DEFAULT_MAX_BLOCKING_THREADS: usize = 512;
const DEFAULT_THREAD_NAME: &str = "monadic-worker";

// =============================================================================
// Configuration
// =============================================================================

/// Errors raised while configuring the worker runtime.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The global runtime was already built; configuration can no longer change.
    #[error("the worker runtime is already running")]
    AlreadyInitialized,

    /// A configuration was already installed.
    #[error("the worker runtime was already configured")]
    AlreadyConfigured,

    /// A thread count was zero.
    #[error("{setting} must be greater than 0")]
    ZeroThreads {
        /// The offending setting.
        setting: &'static str,
    },

    /// An environment variable could not be parsed.
    #[error("{variable} has invalid value {value:?}")]
    InvalidValue {
        /// The environment variable name.
        variable: &'static str,
        /// The raw value found.
        value: String,
    },
}

/// Settings for the worker runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Threads driving asynchronous promise work.
    pub worker_threads: usize,
    /// Upper bound on threads running blocking producers.
    pub max_blocking_threads: usize,
    /// Name given to every runtime thread.
    pub thread_name: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus::get(),
            max_blocking_threads: DEFAULT_MAX_BLOCKING_THREADS,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Sets the number of worker threads.
    #[must_use]
    pub const fn with_worker_threads(mut self, worker_threads: usize) -> Self {
        self.worker_threads = worker_threads;
        self
    }

    /// Sets the blocking thread pool limit.
    #[must_use]
    pub const fn with_max_blocking_threads(mut self, max_blocking_threads: usize) -> Self {
        self.max_blocking_threads = max_blocking_threads;
        self
    }

    /// Sets the thread name.
    #[must_use]
    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }

    /// Reads overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an unparsable or zero value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|variable| std::env::var(variable).ok())
    }

    /// Reads overrides through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is unparsable or zero.
    ///
    /// ```rust
    /// use monadic::effect::runtime::RuntimeConfig;
    ///
    /// let config = RuntimeConfig::from_lookup(|variable| {
    ///     (variable == "MONADIC_WORKER_THREADS").then(|| "3".to_string())
    /// })
    /// .unwrap();
    /// assert_eq!(config.worker_threads, 3);
    /// ```
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(WORKER_THREADS_VARIABLE) {
            config.worker_threads = parse_count(WORKER_THREADS_VARIABLE, &value)?;
        }
        if let Some(value) = lookup(MAX_BLOCKING_THREADS_VARIABLE) {
            config.max_blocking_threads = parse_count(MAX_BLOCKING_THREADS_VARIABLE, &value)?;
        }
        if let Some(value) = lookup(THREAD_NAME_VARIABLE) {
            config.thread_name = value;
        }
        config.validate()?;
        Ok(config)
    }

    /// Checks that every thread count is positive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroThreads`] naming the first zero setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_threads == 0 {
            return Err(ConfigError::ZeroThreads {
                setting: "worker_threads",
            });
        }
        if self.max_blocking_threads == 0 {
            return Err(ConfigError::ZeroThreads {
                setting: "max_blocking_threads",
            });
        }
        Ok(())
    }

    fn build(&self) -> Runtime {
        tracing::debug!(
            worker_threads = self.worker_threads,
            max_blocking_threads = self.max_blocking_threads,
            thread_name = %self.thread_name,
            "building worker runtime"
        );
        Builder::new_multi_thread()
            .worker_threads(self.worker_threads)
            .max_blocking_threads(self.max_blocking_threads)
            .thread_name(self.thread_name.clone())
            .enable_all()
            .build()
            .expect("Failed to create global worker runtime")
    }
}

fn parse_count(variable: &'static str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::InvalidValue {
            variable,
            value: value.to_string(),
        })
}

// =============================================================================
// Global Runtime
// =============================================================================

static CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();
static GLOBAL_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Installs the configuration used when the global runtime is first built.
///
/// # Errors
///
/// - [`ConfigError::ZeroThreads`] if `config` is invalid
/// - [`ConfigError::AlreadyInitialized`] if the runtime is already running
/// - [`ConfigError::AlreadyConfigured`] if a configuration was installed before
pub fn configure(config: RuntimeConfig) -> Result<(), ConfigError> {
    config.validate()?;
    if GLOBAL_RUNTIME.get().is_some() {
        return Err(ConfigError::AlreadyInitialized);
    }
    CONFIG
        .set(config)
        .map_err(|_| ConfigError::AlreadyConfigured)
}

/// Returns the global worker runtime, building it on first call.
///
/// # Panics
///
/// Panics if tokio cannot build the runtime (for example when the OS
/// refuses to spawn threads).
#[must_use]
pub fn global() -> &'static Runtime {
    GLOBAL_RUNTIME.get_or_init(|| {
        let config = CONFIG.get().cloned().unwrap_or_else(|| {
            RuntimeConfig::from_env().unwrap_or_else(|error| {
                tracing::warn!(%error, "ignoring invalid runtime environment; using defaults");
                RuntimeConfig::default()
            })
        });
        config.build()
    })
}

/// Runs a blocking producer on the runtime's blocking pool.
pub(crate) fn spawn_blocking<F, R>(function: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    global().spawn_blocking(function)
}

/// Runs a future on the runtime's workers.
pub(crate) fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    global().spawn(future)
}
