//! Link statistics configuration

use serde::{Deserialize, Serialize};
use services_common::StatsError;
use services_common::constants::{DEFAULT_MAX_TIME_SECS, SECS_PER_HOUR};

/// Configuration for the link statistics service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkStatsConfig {
    /// Maximum simulated time in seconds; statistics track one bucket per
    /// whole hour below this horizon
    pub max_time_secs: u64,
}

impl Default for LinkStatsConfig {
    fn default() -> Self {
        Self {
            max_time_secs: DEFAULT_MAX_TIME_SECS,
        }
    }
}

impl LinkStatsConfig {
    /// Number of tracked hourly buckets.
    ///
    /// Fails fast when the horizon is shorter than one hour: a store with
    /// zero buckets could never hold an observation.
    pub fn tracked_hours(&self) -> Result<usize, StatsError> {
        let hours = usize::try_from(self.max_time_secs / SECS_PER_HOUR).map_err(|_| {
            StatsError::Configuration(format!(
                "max_time_secs {} does not fit the platform word size",
                self.max_time_secs
            ))
        })?;
        if hours == 0 {
            return Err(StatsError::Configuration(format!(
                "max_time_secs {} yields zero hourly buckets",
                self.max_time_secs
            )));
        }
        Ok(hours)
    }
}
