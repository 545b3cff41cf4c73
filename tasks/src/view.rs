//! Projection of the task collection into what should be displayed.
//!
//! [`ViewProjector::project`] is a pure function of the tasks, the active
//! filter and the task being edited. It never touches the store, so it can be
//! re-run after every intent and always yields the same view for the same
//! inputs.

use crate::types::{FilterSelector, Priority, Task, TaskId};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Serialize;
use std::fmt::Write;

/// Default timestamp layout: locale-style date plus hour and minute
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M";

/// Summary counters, always over the whole collection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    /// Every task
    pub total: usize,
    /// Completed tasks
    pub completed: usize,
    /// `total - completed`
    pub pending: usize,
}

impl Counts {
    /// Counts the given tasks
    #[must_use]
    pub fn of(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            total,
            completed,
            pending: total - completed,
        }
    }
}

/// Something the user can do from an entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryIntent {
    /// Flip completion
    Toggle,
    /// Enter edit mode
    Edit,
    /// Remove the task (after confirmation)
    Delete,
    /// Commit the edit
    Save,
    /// Leave edit mode without saving
    Cancel,
}

/// A task shown normally
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayEntry {
    /// Task id
    pub id: TaskId,
    /// Task text, unescaped
    pub text: String,
    /// Priority
    pub priority: Priority,
    /// Uppercased priority name
    pub badge: &'static str,
    /// Creation time, formatted
    pub created: String,
    /// Checkbox state
    pub checked: bool,
}

impl DisplayEntry {
    /// Intents offered by a displayed task
    pub const INTENTS: [EntryIntent; 3] =
        [EntryIntent::Toggle, EntryIntent::Edit, EntryIntent::Delete];
}

/// A task shown as an inline edit form
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EditEntry {
    /// Task id
    pub id: TaskId,
    /// Current text, prefilled into the editor
    pub text: String,
    /// Current priority, preselected
    pub priority: Priority,
}

impl EditEntry {
    /// Intents offered by the edit form
    pub const INTENTS: [EntryIntent; 2] = [EntryIntent::Save, EntryIntent::Cancel];
}

/// One row of the view
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum TaskEntry {
    /// Normal display
    Display(DisplayEntry),
    /// Inline editor
    Edit(EditEntry),
}

impl TaskEntry {
    /// Id of the task behind this row
    #[must_use]
    pub const fn id(&self) -> TaskId {
        match self {
            Self::Display(entry) => entry.id,
            Self::Edit(entry) => entry.id,
        }
    }

    /// Returns true for the inline editor row
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        matches!(self, Self::Edit(_))
    }

    /// Intents the row offers
    #[must_use]
    pub const fn intents(&self) -> &'static [EntryIntent] {
        match self {
            Self::Display(_) => &DisplayEntry::INTENTS,
            Self::Edit(_) => &EditEntry::INTENTS,
        }
    }
}

/// Everything a renderer needs to draw the task list
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    /// Filter that produced `items`
    pub filter: FilterSelector,
    /// Filtered rows, in storage order
    pub items: Vec<TaskEntry>,
    /// Counters over the unfiltered collection
    pub counts: Counts,
    /// True when `items` is empty; renderers show the empty state instead of the list
    pub empty: bool,
}

/// Derives [`ViewModel`]s from task collections
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewProjector {
    timestamp_format: String,
    offset: FixedOffset,
}

impl Default for ViewProjector {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            offset: Utc.fix(),
        }
    }
}

impl ViewProjector {
    /// Projector with the given strftime layout, showing times in `offset`
    #[must_use]
    pub fn new(timestamp_format: impl Into<String>, offset: FixedOffset) -> Self {
        Self {
            timestamp_format: timestamp_format.into(),
            offset,
        }
    }

    /// Same projector, showing times in `offset`
    #[must_use]
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// The strftime layout in use
    #[must_use]
    pub fn timestamp_format(&self) -> &str {
        &self.timestamp_format
    }

    /// Formats a creation timestamp for display
    ///
    /// Falls back to RFC 3339 if the configured layout cannot be rendered.
    #[must_use]
    pub fn format_timestamp(&self, at: DateTime<Utc>) -> String {
        let local = at.with_timezone(&self.offset);
        let mut out = String::new();
        if write!(out, "{}", local.format(&self.timestamp_format)).is_err() {
            return local.to_rfc3339();
        }
        out
    }

    /// Builds the view for `tasks` under `filter`, with `editing` shown as an editor
    #[must_use]
    pub fn project(
        &self,
        tasks: &[Task],
        filter: FilterSelector,
        editing: Option<TaskId>,
    ) -> ViewModel {
        let items: Vec<TaskEntry> = tasks
            .iter()
            .filter(|task| filter.matches(task))
            .map(|task| self.entry(task, editing))
            .collect();

        ViewModel {
            filter,
            empty: items.is_empty(),
            items,
            counts: Counts::of(tasks),
        }
    }

    fn entry(&self, task: &Task, editing: Option<TaskId>) -> TaskEntry {
        if editing == Some(task.id) {
            return TaskEntry::Edit(EditEntry {
                id: task.id,
                text: task.text.clone(),
                priority: task.priority,
            });
        }

        TaskEntry::Display(DisplayEntry {
            id: task.id,
            text: task.text.clone(),
            priority: task.priority,
            badge: task.priority.badge(),
            created: self.format_timestamp(task.created_at),
            checked: task.completed,
        })
    }
}

/// Returns true if `format` is a strftime layout chrono can render
#[must_use]
pub fn is_valid_timestamp_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}
