use std::time::Duration;

use serde::Deserialize;
use serde_with::{serde_as, DurationMilliSeconds, DurationSeconds};

use crate::{ConfigError, ConfigResult};

fn default_work_delay() -> Duration {
    Duration::from_secs(2)
}

fn default_long_process_delay() -> Duration {
    Duration::from_secs(8)
}

fn default_run_for() -> Duration {
    Duration::from_secs(22)
}

fn default_spawned_workers() -> i64 {
    20
}

fn default_channel_workers() -> i64 {
    10
}

fn default_buffer_capacity() -> usize {
    2
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_log_format() -> String {
    String::from("compact")
}

/// Knobs for the demonstrations. Every field is optional in the TOML file.
///
/// ```toml
/// work_delay_ms = 2000
/// long_process_delay_ms = 8000
/// run_for_secs = 22
/// spawned_workers = 20
/// channel_workers = 10
/// wait_group_workers = 10
/// buffer_capacity = 2
/// log_level = "info"
/// log_format = "compact"
/// ```
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DemoConfig {
    /// Artificial latency of one unit of work.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "work_delay_ms", default = "default_work_delay")]
    pub work_delay: Duration,

    /// Latency of the slow operand raced in the select demonstration.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "long_process_delay_ms", default = "default_long_process_delay")]
    pub long_process_delay: Duration,

    /// Wall clock budget the entry point grants background demonstrations.
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(rename = "run_for_secs", default = "default_run_for")]
    pub run_for: Duration,

    #[serde(default = "default_spawned_workers")]
    pub spawned_workers: i64,

    #[serde(default = "default_channel_workers")]
    pub channel_workers: i64,

    #[serde(default = "default_channel_workers")]
    pub wait_group_workers: i64,

    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            work_delay: default_work_delay(),
            long_process_delay: default_long_process_delay(),
            run_for: default_run_for(),
            spawned_workers: default_spawned_workers(),
            channel_workers: default_channel_workers(),
            wait_group_workers: default_channel_workers(),
            buffer_capacity: default_buffer_capacity(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl DemoConfig {
    #[must_use]
    pub fn with_work_delay(mut self, delay: Duration) -> Self {
        self.work_delay = delay;
        self
    }

    #[must_use]
    pub fn with_long_process_delay(mut self, delay: Duration) -> Self {
        self.long_process_delay = delay;
        self
    }

    #[must_use]
    pub fn with_run_for(mut self, budget: Duration) -> Self {
        self.run_for = budget;
        self
    }

    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    #[must_use]
    pub fn with_log_format(mut self, format: impl Into<String>) -> Self {
        self.log_format = format.into();
        self
    }

    /// Rejects values the demonstrations cannot run with.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.buffer_capacity == 0 {
            return Err(ConfigError::InvalidValue(String::from(
                "buffer_capacity must be at least 1, use an unbuffered channel instead",
            )));
        }

        for (name, value) in [
            ("spawned_workers", self.spawned_workers),
            ("channel_workers", self.channel_workers),
            ("wait_group_workers", self.wait_group_workers),
        ] {
            if value < 0 {
                return Err(ConfigError::InvalidValue(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::from_toml_str;

    #[test]
    fn empty_file_yields_defaults() {
        let config: DemoConfig = from_toml_str("").expect("should parse empty config");
        assert_eq!(config, DemoConfig::default());
        assert_eq!(config.work_delay, Duration::from_secs(2));
        assert_eq!(config.run_for, Duration::from_secs(22));
        assert_eq!(config.buffer_capacity, 2);
    }

    #[test]
    fn durations_use_their_unit_suffix() {
        let config: DemoConfig = from_toml_str(
            "work_delay_ms = 10\nlong_process_delay_ms = 40\nrun_for_secs = 3",
        )
        .expect("should parse durations");

        assert_eq!(config.work_delay, Duration::from_millis(10));
        assert_eq!(config.long_process_delay, Duration::from_millis(40));
        assert_eq!(config.run_for, Duration::from_secs(3));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = from_toml_str::<DemoConfig>("work_delay = 10");
        assert!(matches!(result, Err(ConfigError::DeserializationFailed(_))));
    }

    #[test]
    fn validate_rejects_zero_capacity_and_negative_workers() {
        let mut config = DemoConfig::default();
        assert!(config.validate().is_ok());

        config.buffer_capacity = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));

        config.buffer_capacity = 2;
        config.channel_workers = -1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue(message)) if message.contains("channel_workers")
        ));
    }
}
