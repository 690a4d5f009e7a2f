//! Error types for policy construction
//!
//! The executor itself never produces errors of its own: whatever error
//! ends the retry loop is handed back to the caller unmodified. The only
//! fallible surface of this crate is policy construction.

use std::time::Duration;

use thiserror::Error;

/// Errors raised when a retry policy is constructed with invalid parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// The minimum delay exceeds the maximum delay
    #[error("min_delay {min:?} exceeds max_delay {max:?}")]
    DelayRangeInverted {
        /// Configured minimum delay
        min: Duration,
        /// Configured maximum delay
        max: Duration,
    },

    /// The jitter base must be a positive duration
    #[error("delta_base must be greater than zero")]
    ZeroDeltaBase,
}
