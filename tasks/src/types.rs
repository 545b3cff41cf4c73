//! Domain types for the task list.
//!
//! A task list is an ordered collection of short text tasks, each carrying a
//! priority label and a completion flag.

use crate::error::ParseError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use taskdeck_macros::Action;

/// Unique identifier for a task
///
/// Assigned from a counter that starts at 1 and only increases, so an id is
/// never reused within a session, even after its task is deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Creates a `TaskId` from its raw value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .map(Self)
            .map_err(|_| ParseError::InvalidId(s.to_string()))
    }
}

/// Priority label of a task
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority
    Low,
    /// Medium priority (what the input layer preselects)
    #[default]
    Medium,
    /// High priority
    High,
}

impl Priority {
    /// Every priority, lowest first
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Lowercase name, as accepted by [`FromStr`]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Uppercase badge label shown next to a task
    #[must_use]
    pub const fn badge(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseError::UnknownPriority(s.to_string())),
        }
    }
}

/// A single task
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,
    /// Trimmed, non-empty description
    pub text: String,
    /// Priority label
    pub priority: Priority,
    /// Whether the task is done
    pub completed: bool,
    /// When the task was created; never changes
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new, not yet completed task
    ///
    /// Callers are responsible for trimming and validating `text`; the store
    /// does this for every task it creates.
    #[must_use]
    pub const fn new(
        id: TaskId,
        text: String,
        priority: Priority,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            text,
            priority,
            completed: false,
            created_at,
        }
    }
}

/// Criterion narrowing which tasks are displayed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterSelector {
    /// Every task
    #[default]
    All,
    /// Completed tasks only
    Completed,
    /// Tasks not yet completed
    Pending,
    /// Low priority tasks
    Low,
    /// Medium priority tasks
    Medium,
    /// High priority tasks
    High,
}

impl FilterSelector {
    /// Every selector, in the order the filter controls are laid out
    pub const ALL: [Self; 6] = [
        Self::All,
        Self::Completed,
        Self::Pending,
        Self::High,
        Self::Medium,
        Self::Low,
    ];

    /// Lowercase name, as accepted by [`FromStr`]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Returns true if `task` passes this filter
    #[must_use]
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.completed,
            Self::Pending => !task.completed,
            Self::Low => task.priority == Priority::Low,
            Self::Medium => task.priority == Priority::Medium,
            Self::High => task.priority == Priority::High,
        }
    }
}

impl From<Priority> for FilterSelector {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Low => Self::Low,
            Priority::Medium => Self::Medium,
            Priority::High => Self::High,
        }
    }
}

impl fmt::Display for FilterSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterSelector {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|selector| selector.as_str() == name)
            .ok_or_else(|| ParseError::UnknownFilter(s.to_string()))
    }
}

/// Actions representing user intents and the events they lead to
///
/// Intents arrive from the input layer, already decoupled from whatever
/// widget produced them. Events are facts fed back by effects once they have
/// run.
#[derive(Action, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskAction {
    // ========== Intents ==========
    /// Intent: Add a task
    #[intent]
    Add {
        /// Raw text; trimmed by the store
        text: String,
        /// Priority label
        priority: Priority,
    },

    /// Intent: Delete a task (the input layer has already confirmed)
    #[intent]
    Delete {
        /// Task to delete
        id: TaskId,
    },

    /// Intent: Flip a task's completion
    #[intent]
    Toggle {
        /// Task to toggle
        id: TaskId,
    },

    /// Intent: Open a task in the inline editor
    #[intent]
    EditStart {
        /// Task to edit
        id: TaskId,
    },

    /// Intent: Commit the inline editor
    #[intent]
    EditSave {
        /// Task being edited
        id: TaskId,
        /// New raw text; trimmed by the store
        text: String,
        /// New priority
        priority: Priority,
    },

    /// Intent: Close the inline editor without saving
    #[intent]
    EditCancel,

    /// Intent: Change the active filter
    #[intent]
    SetFilter {
        /// New filter
        filter: FilterSelector,
    },

    // ========== Events ==========
    /// Event: A snapshot was handed to the repository
    #[event]
    TasksSaved {
        /// Number of tasks in the snapshot
        count: usize,
    },

    /// Event: The repository rejected a snapshot
    #[event]
    SaveFailed {
        /// Error message
        error: String,
    },
}
