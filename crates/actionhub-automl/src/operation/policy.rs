//! Polling policy for long-running operations.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Default delay before the first status check: 1 second.
pub const DEFAULT_INITIAL_INTERVAL_MS: u64 = 1_000;

/// Default cap on the delay between status checks: 30 seconds.
pub const DEFAULT_MAX_INTERVAL_MS: u64 = 30_000;

/// Default growth factor applied to the delay after each check.
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

/// Default bound on the total wait: 30 minutes.
pub const DEFAULT_MAX_WAIT_MS: u64 = 30 * 60 * 1_000;

/// Shortest delay ever used between two status checks: 100 milliseconds.
pub const MIN_INTERVAL_MS: u64 = 100;

/// Exponential backoff schedule for polling a long-running operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct PollPolicy {
    /// Delay before the first status check, in milliseconds.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "automl-poll-initial-interval-ms",
            env = "AUTOML_POLL_INITIAL_INTERVAL_MS",
            default_value_t = DEFAULT_INITIAL_INTERVAL_MS
        )
    )]
    #[serde(default = "default_initial_interval_ms")]
    pub initial_interval_ms: u64,

    /// Upper bound on the delay between status checks, in milliseconds.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "automl-poll-max-interval-ms",
            env = "AUTOML_POLL_MAX_INTERVAL_MS",
            default_value_t = DEFAULT_MAX_INTERVAL_MS
        )
    )]
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: u64,

    /// Growth factor of the delay; values below 1 keep it constant.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "automl-poll-multiplier",
            env = "AUTOML_POLL_MULTIPLIER",
            default_value_t = DEFAULT_MULTIPLIER
        )
    )]
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Total time to wait for the operation, in milliseconds.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "automl-poll-max-wait-ms",
            env = "AUTOML_POLL_MAX_WAIT_MS",
            default_value_t = DEFAULT_MAX_WAIT_MS
        )
    )]
    #[serde(default = "default_max_wait_ms")]
    pub max_wait_ms: u64,
}

fn default_initial_interval_ms() -> u64 {
    DEFAULT_INITIAL_INTERVAL_MS
}

fn default_max_interval_ms() -> u64 {
    DEFAULT_MAX_INTERVAL_MS
}

fn default_multiplier() -> f64 {
    DEFAULT_MULTIPLIER
}

fn default_max_wait_ms() -> u64 {
    DEFAULT_MAX_WAIT_MS
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_interval_ms: DEFAULT_INITIAL_INTERVAL_MS,
            max_interval_ms: DEFAULT_MAX_INTERVAL_MS,
            multiplier: DEFAULT_MULTIPLIER,
            max_wait_ms: DEFAULT_MAX_WAIT_MS,
        }
    }
}

impl PollPolicy {
    /// Sets the delay before the first status check.
    pub fn with_initial_interval(mut self, interval: Duration) -> Self {
        self.initial_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Sets the upper bound on the delay between status checks.
    pub fn with_max_interval(mut self, interval: Duration) -> Self {
        self.max_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Sets the growth factor of the delay.
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Sets the total time to wait for the operation.
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait_ms = max_wait.as_millis() as u64;
        self
    }

    /// Delay before the first status check, never below [`MIN_INTERVAL_MS`].
    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_interval_ms.max(MIN_INTERVAL_MS))
            .min(self.max_interval())
    }

    /// Upper bound on the delay, never below [`MIN_INTERVAL_MS`].
    pub fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms.max(MIN_INTERVAL_MS))
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }

    /// Returns the delay following `current`, capped at the max interval.
    pub fn next_interval(&self, current: Duration) -> Duration {
        let max = self.max_interval();
        let scaled = current.as_secs_f64() * self.multiplier.max(1.0);

        Duration::try_from_secs_f64(scaled)
            .unwrap_or(max)
            .clamp(Duration::from_millis(MIN_INTERVAL_MS), max)
    }
}
