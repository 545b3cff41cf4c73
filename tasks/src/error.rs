//! Error types for the task list.
//!
//! None of these are fatal. Validation failures leave state untouched and the
//! caller re-prompts; persistence failures are logged and reported back as an
//! event.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A rejected add or edit
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    /// Task text was empty once surrounding whitespace was removed
    #[error("Task text cannot be empty")]
    EmptyText,

    /// Every task id has been handed out
    #[error("No task ids left")]
    IdsExhausted,
}

/// Input that could not be turned into an intent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Not one of `low`, `medium`, `high`
    #[error("Unknown priority '{0}' (expected low, medium or high)")]
    UnknownPriority(String),

    /// Not a filter selector name
    #[error("Unknown filter '{0}' (expected all, completed, pending, low, medium or high)")]
    UnknownFilter(String),

    /// Not a task id
    #[error("Invalid task id '{0}'")]
    InvalidId(String),
}

/// Failure reported by a persistence collaborator
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Backing medium could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Snapshot decoded but its tasks can't form a task list
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Snapshot could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Invalid configuration value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable held a value that doesn't parse
    #[error("Invalid value '{value}' for {var}: {reason}")]
    InvalidValue {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
        /// What was wrong with it
        reason: String,
    },
}
