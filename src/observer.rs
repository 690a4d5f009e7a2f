//! Retry observation and logging
//!
//! This module provides the `RetryObserver` trait for monitoring retry
//! attempts and a `TracingObserver` implementation that logs using the
//! `tracing` crate.

use std::error::Error;
use std::fmt;

/// How a failed attempt was classified by the retry loop
///
/// Communicated to observers as a side effect; never persisted and never
/// part of the propagated error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    /// The predicate rejected a retry; the cause propagates immediately
    NonRetryable,
    /// The policy allowed a retry; another attempt follows after a delay
    RetriesPending,
    /// The policy denied further attempts; the cause propagates
    RetriesExhausted,
}

impl fmt::Display for RetryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryOutcome::NonRetryable => write!(f, "non-retryable"),
            RetryOutcome::RetriesPending => write!(f, "retries-pending"),
            RetryOutcome::RetriesExhausted => write!(f, "retries-exhausted"),
        }
    }
}

/// Observer trait for retry attempt events
///
/// Implement this trait to receive a callback for every failed attempt.
/// This is useful for logging, metrics collection, or debugging. Observers
/// are side-effect-only: a panicking observer is caught and logged by the
/// executor and never alters the result of the retry loop.
///
/// # Example
///
/// ```rust
/// use stamina::{RetryObserver, RetryOutcome};
/// use std::error::Error;
///
/// struct MetricsObserver {
///     // Your metrics client here
/// }
///
/// impl RetryObserver for MetricsObserver {
///     fn on_event(&self, cause: &(dyn Error + 'static), outcome: RetryOutcome, attempt: u32) {
///         // Record a counter keyed by outcome
///     }
/// }
/// ```
pub trait RetryObserver: Send + Sync {
    /// Called once per failed attempt with its classification
    ///
    /// # Arguments
    ///
    /// * `cause` - The error that failed the attempt
    /// * `outcome` - How the retry loop classified the failure
    /// * `attempt` - The attempt index (0-indexed)
    fn on_event(&self, cause: &(dyn Error + 'static), outcome: RetryOutcome, attempt: u32);
}

/// A no-op observer that does nothing
///
/// Use this when you don't need observation but the API requires an
/// observer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl RetryObserver for NoOpObserver {
    fn on_event(&self, _cause: &(dyn Error + 'static), _outcome: RetryOutcome, _attempt: u32) {}
}

/// An observer that logs retry events using the `tracing` crate
///
/// # Log Levels
///
/// - `RetriesPending`: WARN
/// - `NonRetryable`: WARN
/// - `RetriesExhausted`: ERROR
///
/// # Example
///
/// ```rust
/// use stamina::TracingObserver;
///
/// // Create with operation name for better log context
/// let observer = TracingObserver::new("acquire_token");
/// ```
#[derive(Debug, Clone)]
pub struct TracingObserver {
    /// Name of the operation being retried (for log context)
    operation: String,
}

impl TracingObserver {
    /// Create a new tracing observer
    ///
    /// # Arguments
    ///
    /// * `operation` - A descriptive name for the operation being retried
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }

    /// Get the operation name
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("retry")
    }
}

impl RetryObserver for TracingObserver {
    fn on_event(&self, cause: &(dyn Error + 'static), outcome: RetryOutcome, attempt: u32) {
        match outcome {
            RetryOutcome::RetriesPending => {
                tracing::warn!(
                    operation = %self.operation,
                    attempt = attempt,
                    error = %cause,
                    "attempt failed, will retry"
                );
            }
            RetryOutcome::NonRetryable => {
                tracing::warn!(
                    operation = %self.operation,
                    attempt = attempt,
                    error = %cause,
                    "non-retryable failure"
                );
            }
            RetryOutcome::RetriesExhausted => {
                tracing::error!(
                    operation = %self.operation,
                    attempt = attempt,
                    error = %cause,
                    "all retry attempts exhausted"
                );
            }
        }
    }
}

/// An observer that counts retry events per outcome
///
/// Useful for testing and metrics collection.
#[derive(Debug, Default)]
pub struct StatsObserver {
    /// Non-retryable classifications
    pub non_retryable: std::sync::atomic::AtomicU32,
    /// Pending-retry classifications
    pub pending: std::sync::atomic::AtomicU32,
    /// Exhaustion classifications
    pub exhausted: std::sync::atomic::AtomicU32,
}

impl StatsObserver {
    /// Create a new stats observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of non-retryable classifications
    pub fn non_retryable(&self) -> u32 {
        self.non_retryable.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Get the number of pending-retry classifications
    pub fn pending(&self) -> u32 {
        self.pending.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Get the number of exhaustion classifications
    pub fn exhausted(&self) -> u32 {
        self.exhausted.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl RetryObserver for StatsObserver {
    fn on_event(&self, _cause: &(dyn Error + 'static), outcome: RetryOutcome, _attempt: u32) {
        let counter = match outcome {
            RetryOutcome::NonRetryable => &self.non_retryable,
            RetryOutcome::RetriesPending => &self.pending,
            RetryOutcome::RetriesExhausted => &self.exhausted,
        };
        counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

/// Implement RetryObserver for Arc<T> where T: RetryObserver
impl<T: RetryObserver + ?Sized> RetryObserver for std::sync::Arc<T> {
    fn on_event(&self, cause: &(dyn Error + 'static), outcome: RetryOutcome, attempt: u32) {
        (**self).on_event(cause, outcome, attempt)
    }
}

/// Implement RetryObserver for Box<T> where T: RetryObserver
impl<T: RetryObserver + ?Sized> RetryObserver for Box<T> {
    fn on_event(&self, cause: &(dyn Error + 'static), outcome: RetryOutcome, attempt: u32) {
        (**self).on_event(cause, outcome, attempt)
    }
}
