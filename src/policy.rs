//! Retry policies and decisions
//!
//! A policy maps an attempt index and the failure that caused it to a
//! decision: retry after some delay, or stop. Policies are immutable and
//! safe for concurrent reuse; a single policy instance can back unboundedly
//! many executions.

use std::error::Error;
use std::sync::Mutex;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::PolicyError;

/// The per-attempt verdict returned by a [`RetryPolicy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryDecision {
    /// Whether another attempt is allowed
    pub allowed: bool,
    /// How long to wait before that attempt
    pub delay: Duration,
}

impl RetryDecision {
    /// Allow another attempt after the given delay
    pub fn retry_after(delay: Duration) -> Self {
        Self {
            allowed: true,
            delay,
        }
    }

    /// Deny any further attempts
    pub fn stop() -> Self {
        Self {
            allowed: false,
            delay: Duration::ZERO,
        }
    }
}

/// A policy that decides whether and how long to wait before retrying
///
/// `attempt` is 0-indexed: the first failure is reported with `attempt = 0`.
/// The failure cause is passed so that policies can discriminate by error
/// kind; [`ExponentialBackoff`] ignores it.
///
/// # Example
///
/// ```rust
/// use stamina::{RetryDecision, RetryPolicy};
/// use std::error::Error;
/// use std::time::Duration;
///
/// struct EveryOtherSecond;
///
/// impl RetryPolicy for EveryOtherSecond {
///     fn should_retry(&self, attempt: u32, _cause: &(dyn Error + 'static)) -> RetryDecision {
///         if attempt < 5 {
///             RetryDecision::retry_after(Duration::from_secs(2))
///         } else {
///             RetryDecision::stop()
///         }
///     }
/// }
/// ```
pub trait RetryPolicy: Send + Sync {
    /// Decide whether the attempt at `attempt` may be retried, and after
    /// what delay
    fn should_retry(&self, attempt: u32, cause: &(dyn Error + 'static)) -> RetryDecision;
}

impl<P: RetryPolicy + ?Sized> RetryPolicy for std::sync::Arc<P> {
    fn should_retry(&self, attempt: u32, cause: &(dyn Error + 'static)) -> RetryDecision {
        (**self).should_retry(attempt, cause)
    }
}

impl<P: RetryPolicy + ?Sized> RetryPolicy for Box<P> {
    fn should_retry(&self, attempt: u32, cause: &(dyn Error + 'static)) -> RetryDecision {
        (**self).should_retry(attempt, cause)
    }
}

/// Capped exponential backoff with jitter
///
/// The delay before attempt `n` (0-indexed) is
/// `min(min_delay + (2^n - 1) * uniform(0.8 * delta_base, 1.2 * delta_base), max_delay)`,
/// so growth is exponential in the attempt index but always capped at
/// `max_delay`, and the ±20% jitter keeps independent callers from retrying
/// in lockstep.
///
/// The jitter source is owned by the policy and shared across all decisions
/// it makes, rather than a fresh default-seeded generator per call. Use
/// [`ExponentialBackoff::with_rng`] to inject a seeded generator.
#[derive(Debug)]
pub struct ExponentialBackoff {
    max_attempts: u32,
    min_delay: Duration,
    max_delay: Duration,
    delta_base: Duration,
    rng: Mutex<StdRng>,
}

impl ExponentialBackoff {
    /// Default number of retry attempts
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    /// Default minimum backoff
    pub const DEFAULT_MIN_DELAY: Duration = Duration::from_millis(500);
    /// Default maximum backoff
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(1000);
    /// Default base used when drawing the random delta between retries
    pub const DEFAULT_DELTA_BASE: Duration = Duration::from_millis(100);

    /// Create a policy, validating `min_delay <= max_delay` and
    /// `delta_base > 0`
    pub fn new(
        max_attempts: u32,
        min_delay: Duration,
        max_delay: Duration,
        delta_base: Duration,
    ) -> Result<Self, PolicyError> {
        if min_delay > max_delay {
            return Err(PolicyError::DelayRangeInverted {
                min: min_delay,
                max: max_delay,
            });
        }
        if delta_base.is_zero() {
            return Err(PolicyError::ZeroDeltaBase);
        }

        Ok(Self {
            max_attempts,
            min_delay,
            max_delay,
            delta_base,
            rng: Mutex::new(StdRng::from_os_rng()),
        })
    }

    /// Replace the jitter source with a caller-supplied generator
    ///
    /// Seeding the generator makes delay sequences reproducible in tests.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// Get the maximum number of retry attempts
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Get the minimum backoff
    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    /// Get the maximum backoff
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Get the jitter base
    pub fn delta_base(&self) -> Duration {
        self.delta_base
    }

    fn jittered_delta_ms(&self, attempt: u32) -> f64 {
        let base_ms = self.delta_base.as_secs_f64() * 1000.0;
        let drawn = {
            let mut rng = match self.rng.lock() {
                Ok(guard) => guard,
                // RNG state is valid even after a poisoning panic.
                Err(poisoned) => poisoned.into_inner(),
            };
            rng.random_range(0.8 * base_ms..1.2 * base_ms)
        };
        // powi saturates to +inf well before this bound matters; the cap
        // below turns that into max_delay.
        (2f64.powi(attempt.min(1023) as i32) - 1.0) * drawn
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            min_delay: Self::DEFAULT_MIN_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
            delta_base: Self::DEFAULT_DELTA_BASE,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }
}

impl RetryPolicy for ExponentialBackoff {
    fn should_retry(&self, attempt: u32, _cause: &(dyn Error + 'static)) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::stop();
        }

        let min_ms = self.min_delay.as_secs_f64() * 1000.0;
        let max_ms = self.max_delay.as_secs_f64() * 1000.0;
        let interval_ms = (min_ms + self.jittered_delta_ms(attempt)).min(max_ms);

        RetryDecision::retry_after(Duration::from_secs_f64(interval_ms / 1000.0))
    }
}

/// A policy that waits a constant delay between a bounded number of attempts
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    max_attempts: u32,
    delay: Duration,
}

impl FixedDelay {
    /// Create a fixed-delay policy
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

impl RetryPolicy for FixedDelay {
    fn should_retry(&self, attempt: u32, _cause: &(dyn Error + 'static)) -> RetryDecision {
        if attempt >= self.max_attempts {
            RetryDecision::stop()
        } else {
            RetryDecision::retry_after(self.delay)
        }
    }
}

/// A policy that never allows a retry
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetry;

impl RetryPolicy for NoRetry {
    fn should_retry(&self, _attempt: u32, _cause: &(dyn Error + 'static)) -> RetryDecision {
        RetryDecision::stop()
    }
}
