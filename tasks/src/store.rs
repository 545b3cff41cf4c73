//! The authoritative task collection.
//!
//! `TaskStore` owns the ordered tasks and the id counter and performs every
//! mutation. Newly added tasks go to the front; toggling and editing never
//! move a task.
//!
//! Operations on an id that isn't in the store are silent no-ops rather than
//! errors. Only empty text is rejected.
//!
//! A store can only be rebuilt from saved tasks through
//! [`TaskStore::from_tasks`], which checks the tasks and derives the counter
//! from them.

use crate::error::{PersistenceError, ValidationError};
use crate::types::{Priority, Task, TaskId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// Ordered task collection plus the next-id counter
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// Creates an empty store whose first task will get id 1
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// Restores a store from previously saved tasks, keeping their order
    ///
    /// Task text is trimmed. The counter resumes after the highest id present
    /// so restored ids are never handed out again.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::InvalidSnapshot`] if two tasks share an id,
    /// a task has empty text, or the highest id leaves no id for the next add.
    pub fn from_tasks(mut tasks: Vec<Task>) -> Result<Self, PersistenceError> {
        let mut seen = HashSet::with_capacity(tasks.len());
        for task in &mut tasks {
            if !seen.insert(task.id) {
                return Err(PersistenceError::InvalidSnapshot(format!(
                    "duplicate task id {}",
                    task.id
                )));
            }
            task.text = validated_text(&task.text).map_err(|_| {
                PersistenceError::InvalidSnapshot(format!("task {} has empty text", task.id))
            })?;
        }

        let next_id = match tasks.iter().map(|task| task.id.get()).max() {
            None => 1,
            Some(max) => max.checked_add(1).ok_or_else(|| {
                PersistenceError::InvalidSnapshot(format!("task id {max} exhausts the id space"))
            })?,
        };
        Ok(Self { tasks, next_id })
    }

    /// Adds a task at the front of the collection
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyText`] if `text` is empty after
    /// trimming, or [`ValidationError::IdsExhausted`] if no id is left; the
    /// store is left unchanged.
    pub fn add(
        &mut self,
        text: &str,
        priority: Priority,
        now: DateTime<Utc>,
    ) -> Result<Task, ValidationError> {
        let text = validated_text(text)?;

        let following = self
            .next_id
            .checked_add(1)
            .ok_or(ValidationError::IdsExhausted)?;
        let id = TaskId::new(self.next_id);
        self.next_id = following;

        let task = Task::new(id, text, priority, now);
        self.tasks.insert(0, task.clone());
        Ok(task)
    }

    /// Removes the task with `id`, returning it if it was present
    pub fn delete(&mut self, id: TaskId) -> Option<Task> {
        let index = self.position(id)?;
        Some(self.tasks.remove(index))
    }

    /// Flips the completion flag of the task with `id`
    pub fn toggle(&mut self, id: TaskId) -> Option<&Task> {
        let task = self.get_mut(id)?;
        task.completed = !task.completed;
        Some(&*task)
    }

    /// Replaces the text and priority of the task with `id`
    ///
    /// Identity, completion and creation time are preserved. Returns
    /// `Ok(None)` if there is no such task.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyText`] if `new_text` is empty after
    /// trimming; the task is left unchanged.
    pub fn edit(
        &mut self,
        id: TaskId,
        new_text: &str,
        new_priority: Priority,
    ) -> Result<Option<&Task>, ValidationError> {
        let text = validated_text(new_text)?;

        let Some(task) = self.get_mut(id) else {
            return Ok(None);
        };
        task.text = text;
        task.priority = new_priority;
        Ok(Some(&*task))
    }

    /// All tasks, most recently added first
    #[must_use]
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task by id
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Returns true if a task with `id` exists
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Number of tasks
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if there are no tasks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of completed tasks
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    /// The id the next successful `add` will assign
    #[must_use]
    pub const fn next_id(&self) -> TaskId {
        TaskId::new(self.next_id)
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }
}

fn validated_text(text: &str) -> Result<String, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyText);
    }
    Ok(text.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 9, 30, 0).unwrap()
    }

    fn store_with(texts: &[&str]) -> TaskStore {
        let mut store = TaskStore::new();
        for text in texts {
            store.add(text, Priority::Medium, now()).unwrap();
        }
        store
    }

    #[test]
    fn add_assigns_increasing_ids_from_one() {
        let mut store = TaskStore::new();
        let first = store.add("First", Priority::Low, now()).unwrap();
        let second = store.add("Second", Priority::High, now()).unwrap();

        assert_eq!(first.id, TaskId::new(1));
        assert_eq!(second.id, TaskId::new(2));
        assert_eq!(store.next_id(), TaskId::new(3));
    }

    #[test]
    fn add_inserts_at_front() {
        let store = store_with(&["First", "Second", "Third"]);
        let texts: Vec<_> = store.list().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Third", "Second", "First"]);
    }

    #[test]
    fn add_trims_and_initialises() {
        let mut store = TaskStore::new();
        let task = store.add("  Buy milk \n", Priority::Low, now()).unwrap();

        assert_eq!(task.text, "Buy milk");
        assert_eq!(task.priority, Priority::Low);
        assert!(!task.completed);
        assert_eq!(task.created_at, now());
        assert_eq!(store.list()[0], task);
    }

    #[test]
    fn add_rejects_empty_text() {
        let mut store = store_with(&["Keep"]);

        assert_eq!(store.add("", Priority::High, now()), Err(ValidationError::EmptyText));
        assert_eq!(store.add("   \t", Priority::High, now()), Err(ValidationError::EmptyText));
        assert_eq!(store.len(), 1);
        // Rejected adds don't consume ids
        assert_eq!(store.next_id(), TaskId::new(2));
    }

    #[test]
    fn delete_removes_and_preserves_order() {
        let mut store = store_with(&["A", "B", "C"]);
        let removed = store.delete(TaskId::new(2)).unwrap();

        assert_eq!(removed.text, "B");
        let texts: Vec<_> = store.list().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["C", "A"]);
    }

    #[test]
    fn delete_twice_is_noop_second_time() {
        let mut store = store_with(&["A", "B"]);
        assert!(store.delete(TaskId::new(1)).is_some());
        assert!(store.delete(TaskId::new(1)).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn deleted_ids_are_never_reused() {
        let mut store = store_with(&["A", "B"]);
        store.delete(TaskId::new(2));
        let next = store.add("C", Priority::Low, now()).unwrap();
        assert_eq!(next.id, TaskId::new(3));
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut store = store_with(&["A"]);
        let id = TaskId::new(1);

        assert!(store.toggle(id).unwrap().completed);
        assert_eq!(store.completed_count(), 1);
        assert!(!store.toggle(id).unwrap().completed);
        assert_eq!(store.completed_count(), 0);
    }

    #[test]
    fn toggle_does_not_move_task() {
        let mut store = store_with(&["A", "B", "C"]);
        let before: Vec<_> = store.list().iter().map(|t| t.id).collect();
        store.toggle(TaskId::new(2));
        let after: Vec<_> = store.list().iter().map(|t| t.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn edit_updates_text_and_priority_in_place() {
        let mut store = store_with(&["A", "B"]);
        store.toggle(TaskId::new(1));

        let edited = store
            .edit(TaskId::new(1), "  Renamed  ", Priority::High)
            .unwrap()
            .cloned()
            .unwrap();

        assert_eq!(edited.id, TaskId::new(1));
        assert_eq!(edited.text, "Renamed");
        assert_eq!(edited.priority, Priority::High);
        assert!(edited.completed);
        assert_eq!(edited.created_at, now());
        assert_eq!(store.list()[1], edited);
    }

    #[test]
    fn edit_with_empty_text_leaves_task_unchanged() {
        let mut store = store_with(&["A"]);
        let before = store.get(TaskId::new(1)).cloned();

        let result = store.edit(TaskId::new(1), "   ", Priority::High);
        assert_eq!(result, Err(ValidationError::EmptyText));
        assert_eq!(store.get(TaskId::new(1)).cloned(), before);
    }

    // Unknown ids are tolerated rather than reported
    #[test]
    fn unknown_ids_are_silent_noops() {
        let mut store = store_with(&["A"]);
        let before = store.clone();
        let missing = TaskId::new(99);

        assert!(store.delete(missing).is_none());
        assert!(store.toggle(missing).is_none());
        assert_eq!(store.edit(missing, "Text", Priority::Low), Ok(None));
        assert_eq!(store, before);
    }

    #[test]
    fn edit_on_unknown_id_still_validates_text() {
        let mut store = TaskStore::new();
        assert_eq!(
            store.edit(TaskId::new(5), "", Priority::Low),
            Err(ValidationError::EmptyText)
        );
    }

    #[test]
    fn from_tasks_resumes_counter_after_highest_id() {
        let tasks = vec![
            Task::new(TaskId::new(4), "Four".into(), Priority::Low, now()),
            Task::new(TaskId::new(9), "Nine".into(), Priority::High, now()),
        ];
        let mut store = TaskStore::from_tasks(tasks).unwrap();

        assert_eq!(store.next_id(), TaskId::new(10));
        assert_eq!(store.list()[0].id, TaskId::new(4));
        let added = store.add("Ten", Priority::Medium, now()).unwrap();
        assert_eq!(added.id, TaskId::new(10));
    }

    #[test]
    fn from_tasks_rejects_exhausted_id_space() {
        let tasks = vec![Task::new(TaskId::new(u64::MAX), "Last".into(), Priority::Low, now())];
        let result = TaskStore::from_tasks(tasks);
        assert!(matches!(result, Err(PersistenceError::InvalidSnapshot(_))));
    }

    #[test]
    fn add_refuses_once_ids_run_out() {
        let tasks = vec![Task::new(TaskId::new(u64::MAX - 1), "Almost".into(), Priority::Low, now())];
        let mut store = TaskStore::from_tasks(tasks).unwrap();
        assert_eq!(store.next_id(), TaskId::new(u64::MAX));

        assert_eq!(
            store.add("New", Priority::Medium, now()),
            Err(ValidationError::IdsExhausted)
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.next_id(), TaskId::new(u64::MAX));
    }

    #[test]
    fn from_tasks_rejects_duplicate_ids() {
        let tasks = vec![
            Task::new(TaskId::new(1), "A".into(), Priority::Low, now()),
            Task::new(TaskId::new(1), "B".into(), Priority::Low, now()),
        ];
        let err = TaskStore::from_tasks(tasks).unwrap_err();
        assert!(err.to_string().contains("duplicate task id 1"));
    }

    #[test]
    fn from_tasks_rejects_blank_text_and_trims() {
        let blank = vec![Task::new(TaskId::new(1), "  ".into(), Priority::Low, now())];
        assert!(matches!(
            TaskStore::from_tasks(blank),
            Err(PersistenceError::InvalidSnapshot(_))
        ));

        let padded = vec![Task::new(TaskId::new(1), " Pad ".into(), Priority::Low, now())];
        let store = TaskStore::from_tasks(padded).unwrap();
        assert_eq!(store.list()[0].text, "Pad");
    }

    #[test]
    fn from_empty_tasks_starts_at_one() {
        let store = TaskStore::from_tasks(Vec::new()).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.next_id(), TaskId::new(1));
    }
}
