//! Refresh scheduler configuration.

use std::time::Duration;

/// Default time between automatic refreshes: 5 minutes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Configuration for the refresh scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Period between automatic refreshes, counted from subscription start.
    pub refresh_interval: Duration,

    /// Capacity of the command queue between handles and the scheduler.
    pub command_buffer: usize,
}

impl SchedulerConfig {
    /// Set the refresh period.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            command_buffer: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.refresh_interval, Duration::from_secs(300));
        assert_eq!(config.command_buffer, 32);
    }

    #[test]
    fn custom_interval() {
        let config = SchedulerConfig::default().with_refresh_interval(Duration::from_secs(60));
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
    }
}
