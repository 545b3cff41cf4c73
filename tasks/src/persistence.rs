//! Persistence collaborators.
//!
//! The task list keeps nothing across restarts. The reducer still hands a
//! snapshot to a [`TaskRepository`] after every change, so a real backing
//! medium can be plugged in without touching the core.

use crate::error::PersistenceError;
use crate::types::{Priority, Task, TaskId};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use taskdeck_core::environment::Clock;

/// Sample tasks a new session starts with, in display order
pub const SEED_TASKS: [(&str, Priority); 2] = [
    ("Welcome to your new To-Do App!", Priority::High),
    ("Try adding a new task above", Priority::Medium),
];

/// Load/save pair the core calls without knowing the backing medium
pub trait TaskRepository: Send + Sync {
    /// Tasks to start the session with, in display order
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the backing medium can't be read.
    fn load(&self) -> Result<Vec<Task>, PersistenceError>;

    /// Replaces the stored tasks with `tasks`
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the backing medium can't be written.
    fn save(&self, tasks: &[Task]) -> Result<(), PersistenceError>;
}

/// Starts every session with [`SEED_TASKS`] and discards saves
pub struct SeededRepository {
    clock: Arc<dyn Clock>,
}

impl SeededRepository {
    /// Seeds are stamped with `clock` at load time
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl TaskRepository for SeededRepository {
    fn load(&self) -> Result<Vec<Task>, PersistenceError> {
        let tasks = SEED_TASKS
            .iter()
            .zip(1_u64..)
            .map(|((text, priority), id)| {
                Task::new(TaskId::new(id), (*text).to_string(), *priority, self.clock.now())
            })
            .collect();
        Ok(tasks)
    }

    fn save(&self, tasks: &[Task]) -> Result<(), PersistenceError> {
        tracing::trace!(count = tasks.len(), "Discarding snapshot; tasks live in memory only");
        Ok(())
    }
}

/// Keeps the latest snapshot in memory, encoded as JSON
///
/// Encoding on every save exercises the same path a file or network backend
/// would, and makes the stored form easy to inspect in tests.
#[derive(Default)]
pub struct InMemoryRepository {
    snapshot: Mutex<Option<String>>,
    saves: AtomicUsize,
}

impl InMemoryRepository {
    /// An empty repository; `load` returns no tasks
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose `load` returns `tasks`
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Serialization`] if the tasks can't be encoded.
    pub fn with_tasks(tasks: &[Task]) -> Result<Self, PersistenceError> {
        let encoded = serde_json::to_string(tasks)?;
        Ok(Self {
            snapshot: Mutex::new(Some(encoded)),
            saves: AtomicUsize::new(0),
        })
    }

    /// Number of successful saves so far
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Acquire)
    }

    /// The stored snapshot, as JSON
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Storage`] if the snapshot lock is poisoned.
    pub fn snapshot(&self) -> Result<Option<String>, PersistenceError> {
        let guard = self
            .snapshot
            .lock()
            .map_err(|_| PersistenceError::Storage("snapshot lock poisoned".to_string()))?;
        Ok(guard.clone())
    }
}

impl TaskRepository for InMemoryRepository {
    fn load(&self) -> Result<Vec<Task>, PersistenceError> {
        match self.snapshot()? {
            Some(encoded) => Ok(serde_json::from_str(&encoded)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<(), PersistenceError> {
        let encoded = serde_json::to_string(tasks)?;
        let mut guard = self
            .snapshot
            .lock()
            .map_err(|_| PersistenceError::Storage("snapshot lock poisoned".to_string()))?;
        *guard = Some(encoded);
        self.saves.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}
