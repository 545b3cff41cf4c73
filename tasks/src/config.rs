//! Configuration management for the task list.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::ConfigError;
use crate::types::Priority;
use crate::view::{DEFAULT_TIMESTAMP_FORMAT, is_valid_timestamp_format};
use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskdeckConfig {
    /// Start with the sample tasks (`TASKDECK_SEED`, default: true)
    pub seed: bool,
    /// Priority used when a command names none (`TASKDECK_DEFAULT_PRIORITY`, default: medium)
    pub default_priority: Priority,
    /// chrono format for creation timestamps (`TASKDECK_TIME_FORMAT`)
    pub time_format: String,
    /// Ask before deleting (`TASKDECK_CONFIRM_DELETE`, default: true)
    pub confirm_delete: bool,
    /// Tracing filter directive (`TASKDECK_LOG`, default: `taskdeck=info`)
    pub log_filter: String,
}

impl Default for TaskdeckConfig {
    fn default() -> Self {
        Self {
            seed: true,
            default_priority: Priority::default(),
            time_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            confirm_delete: true,
            log_filter: "taskdeck=info".to_string(),
        }
    }
}

fn parse_bool(var: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value,
            reason: "expected true or false".to_string(),
        }),
    }
}

impl TaskdeckConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to a value that doesn't parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to a value that doesn't parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let seed = lookup("TASKDECK_SEED")
            .map(|value| parse_bool("TASKDECK_SEED", value))
            .transpose()?
            .unwrap_or(defaults.seed);

        let confirm_delete = lookup("TASKDECK_CONFIRM_DELETE")
            .map(|value| parse_bool("TASKDECK_CONFIRM_DELETE", value))
            .transpose()?
            .unwrap_or(defaults.confirm_delete);

        let default_priority = lookup("TASKDECK_DEFAULT_PRIORITY")
            .map(|value| {
                value.parse().map_err(|e: crate::error::ParseError| ConfigError::InvalidValue {
                    var: "TASKDECK_DEFAULT_PRIORITY",
                    value,
                    reason: e.to_string(),
                })
            })
            .transpose()?
            .unwrap_or(defaults.default_priority);

        let time_format = match lookup("TASKDECK_TIME_FORMAT") {
            Some(value) if is_valid_timestamp_format(&value) => value,
            Some(value) => {
                return Err(ConfigError::InvalidValue {
                    var: "TASKDECK_TIME_FORMAT",
                    value,
                    reason: "not a valid strftime format".to_string(),
                });
            },
            None => defaults.time_format,
        };

        let log_filter = lookup("TASKDECK_LOG")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        Ok(Self {
            seed,
            default_priority,
            time_format,
            confirm_delete,
            log_filter,
        })
    }
}
