//! # stamina
//!
//! A reusable, policy-based retry execution engine for async operations.
//!
//! The executor drives an arbitrary fallible async operation through a
//! retry policy: after each failure a caller-supplied predicate classifies
//! the error as transient or not, the policy decides whether another
//! attempt is allowed and how long to wait, and an observer is notified of
//! every outcome. Whatever error finally ends the loop is returned to the
//! caller verbatim, never wrapped or replaced.
//!
//! # Features
//!
//! - Capped exponential backoff with jitter, plus fixed-delay and no-retry
//!   policies behind the same `RetryPolicy` trait
//! - Transient-failure classification via the `TransientPredicate` trait
//! - Observable retry attempts via the `RetryObserver` trait, with a
//!   built-in `TracingObserver` for logging
//! - Cooperative cancellation of in-flight retry loops
//! - Builder pattern for flexible executor configuration
//! - Thread-safe with Send + Sync bounds
//!
//! # Example
//!
//! ```rust,no_run
//! use stamina::{retry_with_policy, ExponentialBackoff};
//!
//! async fn example() -> Result<String, std::io::Error> {
//!     let policy = ExponentialBackoff::default();
//!
//!     retry_with_policy(policy, || async {
//!         // Your fallible operation here
//!         Ok("success".to_string())
//!     }).await
//! }
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod observer;
pub mod policy;
pub mod predicate;

pub use config::{RetryConfig, RetryProfiles};
pub use error::PolicyError;
pub use executor::{retry_with_policy, RetryExecutor, RetryExecutorBuilder, RetryResult};
pub use observer::{NoOpObserver, RetryObserver, RetryOutcome, StatsObserver, TracingObserver};
pub use policy::{ExponentialBackoff, FixedDelay, NoRetry, RetryDecision, RetryPolicy};
pub use predicate::{AlwaysTransient, ClosurePredicate, NeverTransient, TransientPredicate};
