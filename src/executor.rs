//! Retry execution engine
//!
//! This module provides the core retry execution loop with configurable
//! policies, predicates, and observers. The loop offers at-least-once
//! execution semantics: the wrapped operation may run once per attempt, so
//! callers must ensure it is idempotent or safe to repeat.

use std::error::Error;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::observer::{NoOpObserver, RetryObserver, RetryOutcome};
use crate::policy::{ExponentialBackoff, RetryPolicy};
use crate::predicate::{AlwaysTransient, TransientPredicate};

/// Execute an async operation with retry logic based on a policy
///
/// Every error is treated as transient and no observer is attached. For
/// more control, use `RetryExecutorBuilder`.
///
/// # Arguments
///
/// * `policy` - The retry policy to use
/// * `op` - A closure that returns a future representing the operation
///
/// # Returns
///
/// The result of the operation, or the final error verbatim once the
/// policy denies further attempts.
///
/// # Example
///
/// ```rust,no_run
/// use stamina::{retry_with_policy, ExponentialBackoff};
///
/// async fn example() {
///     let policy = ExponentialBackoff::default();
///
///     let result = retry_with_policy(policy, || async {
///         // Simulated operation that might fail
///         Ok::<_, std::io::Error>("success")
///     }).await;
/// }
/// ```
pub async fn retry_with_policy<S, F, Fut, T, E>(policy: S, op: F) -> Result<T, E>
where
    S: RetryPolicy,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Error + Send + 'static,
{
    RetryExecutorBuilder::new()
        .with_policy(policy)
        .build()
        .execute(op)
        .await
}

/// The terminal state of a cancellable retry loop
///
/// `Ok` and `Err` mirror the plain `Result` of [`RetryExecutor::execute`];
/// `Cancelled` means the caller's cancellation future resolved before the
/// loop reached a terminal state of its own.
#[derive(Debug)]
pub enum RetryResult<T, E> {
    /// The operation succeeded
    Ok(T),
    /// The loop ended in failure; the final cause, unmodified
    Err(E),
    /// The cancellation signal fired during an attempt or a delay
    Cancelled,
}

impl<T, E> RetryResult<T, E> {
    /// Returns true if the operation succeeded
    pub fn is_ok(&self) -> bool {
        matches!(self, RetryResult::Ok(_))
    }

    /// Returns true if the loop was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RetryResult::Cancelled)
    }

    /// Convert into a `Result`, or `None` if the loop was cancelled
    pub fn into_result(self) -> Option<Result<T, E>> {
        match self {
            RetryResult::Ok(value) => Some(Ok(value)),
            RetryResult::Err(cause) => Some(Err(cause)),
            RetryResult::Cancelled => None,
        }
    }
}

/// Builder for configuring a `RetryExecutor`
///
/// # Example
///
/// ```rust
/// use stamina::{ExponentialBackoff, RetryExecutorBuilder, TracingObserver};
///
/// let executor = RetryExecutorBuilder::new()
///     .with_policy(ExponentialBackoff::default())
///     .with_observer(TracingObserver::new("acquire_token"))
///     .build();
/// ```
pub struct RetryExecutorBuilder<S = ExponentialBackoff, P = AlwaysTransient, O = NoOpObserver> {
    policy: S,
    predicate: P,
    observer: O,
}

impl Default for RetryExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryExecutorBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            policy: ExponentialBackoff::default(),
            predicate: AlwaysTransient,
            observer: NoOpObserver,
        }
    }
}

impl<S, P, O> RetryExecutorBuilder<S, P, O> {
    /// Set the retry policy
    pub fn with_policy<S2>(self, policy: S2) -> RetryExecutorBuilder<S2, P, O> {
        RetryExecutorBuilder {
            policy,
            predicate: self.predicate,
            observer: self.observer,
        }
    }

    /// Set the transient predicate
    ///
    /// The predicate determines whether a failure is retry-eligible at all;
    /// non-transient failures propagate without consulting the policy.
    pub fn with_predicate<P2>(self, predicate: P2) -> RetryExecutorBuilder<S, P2, O> {
        RetryExecutorBuilder {
            policy: self.policy,
            predicate,
            observer: self.observer,
        }
    }

    /// Set the observer
    ///
    /// The observer receives one callback per failed attempt.
    pub fn with_observer<O2>(self, observer: O2) -> RetryExecutorBuilder<S, P, O2> {
        RetryExecutorBuilder {
            policy: self.policy,
            predicate: self.predicate,
            observer,
        }
    }

    /// Build the executor
    pub fn build(self) -> RetryExecutor<S, P, O> {
        RetryExecutor {
            policy: self.policy,
            predicate: self.predicate,
            observer: self.observer,
        }
    }
}

/// A retry executor with configurable policy, predicate, and observer
///
/// Use `RetryExecutorBuilder` to create an instance. The executor is
/// immutable and safe to share: concurrent `execute` calls carry their own
/// attempt counters and never contend.
pub struct RetryExecutor<S, P, O> {
    policy: S,
    predicate: P,
    observer: O,
}

impl<S, P, O> RetryExecutor<S, P, O>
where
    S: RetryPolicy,
    O: RetryObserver,
{
    /// Execute an operation with retry logic
    ///
    /// Unit-returning operations are the same loop with `T = ()`.
    ///
    /// # Arguments
    ///
    /// * `op` - A closure that returns a future representing the operation
    ///
    /// # Returns
    ///
    /// The result of the operation, or the error that ended the loop,
    /// verbatim.
    pub async fn execute<F, Fut, T, E>(&self, op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Error + Send + 'static,
        P: TransientPredicate<E>,
    {
        match self
            .execute_cancellable(op, std::future::pending::<()>())
            .await
        {
            RetryResult::Ok(value) => Ok(value),
            RetryResult::Err(cause) => Err(cause),
            RetryResult::Cancelled => unreachable!("pending() never resolves"),
        }
    }

    /// Execute an operation with retry logic, racing a cancellation future
    ///
    /// The cancellation future is observed both while the operation is in
    /// flight and during the inter-attempt delay, so an in-flight loop
    /// aborts promptly instead of running to exhaustion.
    ///
    /// # Arguments
    ///
    /// * `op` - A closure that returns a future representing the operation
    /// * `cancel` - A future that resolves when the loop should abort
    pub async fn execute_cancellable<F, Fut, T, E, C>(
        &self,
        mut op: F,
        cancel: C,
    ) -> RetryResult<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Error + Send + 'static,
        P: TransientPredicate<E>,
        C: Future<Output = ()>,
    {
        tokio::pin!(cancel);
        let mut attempt: u32 = 0;

        loop {
            let result = tokio::select! {
                result = op() => result,
                _ = &mut cancel => return RetryResult::Cancelled,
            };

            let cause = match result {
                Ok(value) => return RetryResult::Ok(value),
                Err(cause) => cause,
            };

            if !self.predicate.is_transient(&cause) {
                self.notify(&cause, RetryOutcome::NonRetryable, attempt);
                return RetryResult::Err(cause);
            }

            let decision = self.policy.should_retry(attempt, &cause);

            if !decision.allowed {
                self.notify(&cause, RetryOutcome::RetriesExhausted, attempt);
                return RetryResult::Err(cause);
            }

            self.notify(&cause, RetryOutcome::RetriesPending, attempt);

            if !decision.delay.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(decision.delay) => {}
                    _ = &mut cancel => return RetryResult::Cancelled,
                }
            }

            attempt += 1;
        }
    }

    /// Notify the observer, isolating any panic it raises
    ///
    /// An observer failure must never replace or suppress the cause being
    /// propagated, so it is caught and logged instead.
    fn notify(&self, cause: &(dyn Error + 'static), outcome: RetryOutcome, attempt: u32) {
        let observed = catch_unwind(AssertUnwindSafe(|| {
            self.observer.on_event(cause, outcome, attempt)
        }));
        if observed.is_err() {
            tracing::warn!(%outcome, attempt, "retry observer panicked; event dropped");
        }
    }
}
