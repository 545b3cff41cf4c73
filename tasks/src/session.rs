//! Per-session controller state.
//!
//! The store owns the tasks; the session additionally tracks which filter is
//! active and which task, if any, is open in the inline editor. None of it
//! outlives the running session.

use crate::error::{PersistenceError, ValidationError};
use crate::persistence::TaskRepository;
use crate::store::TaskStore;
use crate::types::{FilterSelector, TaskId};
use crate::view::{ViewModel, ViewProjector};
use serde::{Deserialize, Serialize};

/// Edit mode state machine
///
/// At most one task is edited at a time. Starting an edit on another task
/// abandons the current one without saving it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditMode {
    /// No task is being edited
    #[default]
    Viewing,
    /// The task with this id is open in the editor
    Editing(TaskId),
}

impl EditMode {
    /// Id of the task being edited
    #[must_use]
    pub const fn editing(self) -> Option<TaskId> {
        match self {
            Self::Viewing => None,
            Self::Editing(id) => Some(id),
        }
    }
}

/// Everything the task reducer operates on
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Task collection
    pub store: TaskStore,
    /// Active filter
    pub filter: FilterSelector,
    /// Inline editor state
    pub edit_mode: EditMode,
    /// Outcome of the most recent add or save, if it was rejected
    pub last_error: Option<ValidationError>,
    /// Why the most recent snapshot could not be saved, if it couldn't
    pub save_error: Option<String>,
}

impl Session {
    /// A fresh session over `store`, showing every task
    #[must_use]
    pub fn new(store: TaskStore) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }

    /// Starts a session from whatever `repository` holds
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the repository can't be read or its
    /// tasks don't form a valid task list.
    pub fn restore(repository: &dyn TaskRepository) -> Result<Self, PersistenceError> {
        let tasks = repository.load()?;
        tracing::debug!(count = tasks.len(), "Restored tasks");
        Ok(Self::new(TaskStore::from_tasks(tasks)?))
    }

    /// Projects the current state through `projector`
    #[must_use]
    pub fn view(&self, projector: &ViewProjector) -> ViewModel {
        projector.project(self.store.list(), self.filter, self.edit_mode.editing())
    }
}
