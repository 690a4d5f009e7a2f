//! Serde-facing retry configuration
//!
//! Mirrors the shape of a configuration file: a default backoff plus
//! per-operation overrides, with millisecond integer fields so values stay
//! readable in YAML or JSON.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::policy::ExponentialBackoff;

/// Backoff configuration for one operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Minimum backoff in milliseconds
    #[serde(default = "default_min_delay")]
    pub min_delay_ms: u64,

    /// Maximum backoff in milliseconds
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// Jitter base in milliseconds
    #[serde(default = "default_delta_base")]
    pub delta_base_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            min_delay_ms: default_min_delay(),
            max_delay_ms: default_max_delay(),
            delta_base_ms: default_delta_base(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}
fn default_min_delay() -> u64 {
    500
}
fn default_max_delay() -> u64 {
    1000
}
fn default_delta_base() -> u64 {
    100
}

impl RetryConfig {
    /// Build an [`ExponentialBackoff`] policy, validating the invariants
    pub fn build(&self) -> Result<ExponentialBackoff, PolicyError> {
        ExponentialBackoff::new(
            self.max_attempts,
            Duration::from_millis(self.min_delay_ms),
            Duration::from_millis(self.max_delay_ms),
            Duration::from_millis(self.delta_base_ms),
        )
    }
}

impl TryFrom<&RetryConfig> for ExponentialBackoff {
    type Error = PolicyError;

    fn try_from(config: &RetryConfig) -> Result<Self, Self::Error> {
        config.build()
    }
}

/// Retry configuration for a whole application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryProfiles {
    /// Default backoff configuration
    #[serde(default)]
    pub default: RetryConfig,

    /// Per-operation overrides
    #[serde(default)]
    pub operations: HashMap<String, RetryConfig>,
}

impl RetryProfiles {
    /// Get the configuration for an operation, falling back to the default
    pub fn config_for(&self, operation: &str) -> &RetryConfig {
        self.operations.get(operation).unwrap_or(&self.default)
    }
}
