//! Scheduler cadence and job configuration.

use serde::Deserialize;

use crate::application::Cadence;
use crate::error::ConfigError;

/// One job's settings. `interval_ms = -1` runs the job once.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub interval_ms: i64,
}

fn default_true() -> bool {
    true
}

impl JobConfig {
    /// Decode the interval.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for zero or negative values
    /// other than `-1`.
    #[allow(clippy::result_large_err)]
    pub fn cadence(&self, field: &'static str) -> Result<Cadence, ConfigError> {
        Cadence::from_millis(field, self.interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JobsConfig {
    /// Recomputes every opportunity.
    pub monitor: JobConfig,
    /// Loads the fee table at startup.
    pub fee_warmup: JobConfig,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            monitor: JobConfig {
                enabled: true,
                interval_ms: 3000,
            },
            fee_warmup: JobConfig {
                enabled: true,
                interval_ms: -1,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// How often due jobs are checked.
    pub tick_ms: u64,
    pub jobs: JobsConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_ms: 1000,
            jobs: JobsConfig::default(),
        }
    }
}
