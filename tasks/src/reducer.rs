//! Reducer logic for the task list.
//!
//! Intents are validated and applied to the [`Session`] in place. Every change
//! to the task collection is followed by a save effect that hands a snapshot
//! to the repository and feeds back [`TaskAction::TasksSaved`] or
//! [`TaskAction::SaveFailed`].

use crate::error::ValidationError;
use crate::persistence::TaskRepository;
use crate::session::{EditMode, Session};
use crate::types::{Priority, TaskAction, TaskId};
use std::sync::Arc;
use taskdeck_core::{SmallVec, effect::Effect, environment::Clock, reducer::Reducer, smallvec};

/// Environment dependencies for the task reducer
#[derive(Clone)]
pub struct TaskEnvironment {
    /// Clock for creation timestamps
    pub clock: Arc<dyn Clock>,
    /// Where snapshots are saved after each change
    pub repository: Arc<dyn TaskRepository>,
}

impl TaskEnvironment {
    /// Creates a new `TaskEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, repository: Arc<dyn TaskRepository>) -> Self {
        Self { clock, repository }
    }
}

/// Reducer for the task list
#[derive(Clone, Debug, Default)]
pub struct TaskReducer;

impl TaskReducer {
    /// Creates a new `TaskReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Effect that saves the current collection
    fn save(state: &Session, env: &TaskEnvironment) -> Effect<TaskAction> {
        let snapshot = state.store.list().to_vec();
        let repository = Arc::clone(&env.repository);

        Effect::run(move || match repository.save(&snapshot) {
            Ok(()) => Some(TaskAction::TasksSaved {
                count: snapshot.len(),
            }),
            Err(error) => Some(TaskAction::SaveFailed {
                error: error.to_string(),
            }),
        })
    }

    fn reject(state: &mut Session, error: ValidationError) {
        tracing::warn!(%error, "Rejected task input");
        state.last_error = Some(error);
    }

    fn add(
        state: &mut Session,
        text: &str,
        priority: Priority,
        env: &TaskEnvironment,
    ) -> SmallVec<[Effect<TaskAction>; 4]> {
        match state.store.add(text, priority, env.clock.now()) {
            Ok(task) => {
                tracing::info!(id = %task.id, %priority, "Task added");
                smallvec![Self::save(state, env)]
            },
            Err(error) => {
                Self::reject(state, error);
                SmallVec::new()
            },
        }
    }

    fn delete(
        state: &mut Session,
        id: TaskId,
        env: &TaskEnvironment,
    ) -> SmallVec<[Effect<TaskAction>; 4]> {
        if state.store.delete(id).is_none() {
            tracing::debug!(%id, "Delete of unknown task ignored");
            return SmallVec::new();
        }

        tracing::info!(%id, "Task deleted");
        if state.edit_mode == EditMode::Editing(id) {
            state.edit_mode = EditMode::Viewing;
        }
        smallvec![Self::save(state, env)]
    }

    fn toggle(
        state: &mut Session,
        id: TaskId,
        env: &TaskEnvironment,
    ) -> SmallVec<[Effect<TaskAction>; 4]> {
        let Some(task) = state.store.toggle(id) else {
            tracing::debug!(%id, "Toggle of unknown task ignored");
            return SmallVec::new();
        };

        tracing::info!(%id, completed = task.completed, "Task toggled");
        smallvec![Self::save(state, env)]
    }

    fn start_edit(state: &mut Session, id: TaskId) {
        if !state.store.contains(id) {
            tracing::debug!(%id, "Edit of unknown task ignored");
            return;
        }

        if let Some(previous) = state.edit_mode.editing().filter(|&previous| previous != id) {
            tracing::debug!(%previous, "Abandoning unsaved edit");
        }
        state.edit_mode = EditMode::Editing(id);
    }

    fn save_edit(
        state: &mut Session,
        id: TaskId,
        text: &str,
        priority: Priority,
        env: &TaskEnvironment,
    ) -> SmallVec<[Effect<TaskAction>; 4]> {
        if state.edit_mode != EditMode::Editing(id) {
            tracing::debug!(%id, "Save for a task not being edited ignored");
            return SmallVec::new();
        }

        // Saving always leaves edit mode, even when the text is rejected
        state.edit_mode = EditMode::Viewing;

        match state.store.edit(id, text, priority) {
            Ok(Some(_)) => {
                tracing::info!(%id, %priority, "Task edited");
                smallvec![Self::save(state, env)]
            },
            Ok(None) => {
                tracing::debug!(%id, "Save of unknown task ignored");
                SmallVec::new()
            },
            Err(error) => {
                Self::reject(state, error);
                SmallVec::new()
            },
        }
    }
}

impl Reducer for TaskReducer {
    type State = Session;
    type Action = TaskAction;
    type Environment = TaskEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        tracing::debug!(action = action.action_name(), "Reducing task action");

        if action.is_intent() {
            state.last_error = None;
        }

        match action {
            // ========== Intents ==========
            TaskAction::Add { text, priority } => Self::add(state, &text, priority, env),

            TaskAction::Delete { id } => Self::delete(state, id, env),

            TaskAction::Toggle { id } => Self::toggle(state, id, env),

            TaskAction::EditStart { id } => {
                Self::start_edit(state, id);
                SmallVec::new()
            },

            TaskAction::EditSave { id, text, priority } => {
                Self::save_edit(state, id, &text, priority, env)
            },

            TaskAction::EditCancel => {
                state.edit_mode = EditMode::Viewing;
                SmallVec::new()
            },

            TaskAction::SetFilter { filter } => {
                state.filter = filter;
                SmallVec::new()
            },

            // ========== Events ==========
            TaskAction::TasksSaved { count } => {
                tracing::trace!(count, "Snapshot saved");
                state.save_error = None;
                SmallVec::new()
            },

            TaskAction::SaveFailed { error } => {
                tracing::warn!(%error, "Failed to save tasks");
                state.save_error = Some(error);
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic
mod tests {
    use super::*;
    use crate::error::PersistenceError;
    use crate::persistence::{InMemoryRepository, SeededRepository};
    use crate::store::TaskStore;
    use crate::types::{FilterSelector, Task};
    use taskdeck_testing::{ReducerTest, assertions, test_clock};

    fn create_test_env() -> TaskEnvironment {
        TaskEnvironment::new(Arc::new(test_clock()), Arc::new(InMemoryRepository::new()))
    }

    fn seeded_session() -> Session {
        Session::restore(&SeededRepository::new(Arc::new(test_clock()))).unwrap()
    }

    struct BrokenRepository;

    impl TaskRepository for BrokenRepository {
        fn load(&self) -> Result<Vec<Task>, PersistenceError> {
            Ok(Vec::new())
        }

        fn save(&self, _tasks: &[Task]) -> Result<(), PersistenceError> {
            Err(PersistenceError::Storage("disk full".to_string()))
        }
    }

    #[test]
    fn test_add_task_success() {
        ReducerTest::new(TaskReducer::new())
            .with_env(create_test_env())
            .given_state(seeded_session())
            .when_action(TaskAction::Add {
                text: "  Buy milk ".to_string(),
                priority: Priority::Low,
            })
            .then_state(|state| {
                assert_eq!(state.store.len(), 3);
                let front = &state.store.list()[0];
                assert_eq!(front.id, TaskId::new(3));
                assert_eq!(front.text, "Buy milk");
                assert_eq!(front.priority, Priority::Low);
                assert!(!front.completed);
                assert_eq!(front.created_at, test_clock().now());
                assert!(state.last_error.is_none());
            })
            .then_effects(assertions::assert_has_run_effect)
            .run();
    }

    #[test]
    fn test_add_task_empty_text() {
        ReducerTest::new(TaskReducer::new())
            .with_env(create_test_env())
            .given_state(seeded_session())
            .when_action(TaskAction::Add {
                text: "   ".to_string(),
                priority: Priority::High,
            })
            .then_state(|state| {
                assert_eq!(state.store.len(), 2);
                assert_eq!(state.last_error, Some(ValidationError::EmptyText));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_next_intent_clears_last_error() {
        ReducerTest::new(TaskReducer::new())
            .with_env(create_test_env())
            .given_state(seeded_session())
            .when_action(TaskAction::Add {
                text: String::new(),
                priority: Priority::High,
            })
            .when_action(TaskAction::SetFilter {
                filter: FilterSelector::High,
            })
            .then_state(|state| {
                assert!(state.last_error.is_none());
                assert_eq!(state.filter, FilterSelector::High);
            })
            .run();
    }

    #[test]
    fn test_toggle_task() {
        ReducerTest::new(TaskReducer::new())
            .with_env(create_test_env())
            .given_state(seeded_session())
            .when_action(TaskAction::Toggle { id: TaskId::new(2) })
            .then_state(|state| {
                assert!(state.store.get(TaskId::new(2)).unwrap().completed);
                assert_eq!(state.store.completed_count(), 1);
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }

    #[test]
    fn test_unknown_ids_produce_no_effects() {
        let missing = TaskId::new(42);
        for action in [
            TaskAction::Delete { id: missing },
            TaskAction::Toggle { id: missing },
            TaskAction::EditStart { id: missing },
            TaskAction::EditSave {
                id: missing,
                text: "Text".to_string(),
                priority: Priority::Low,
            },
        ] {
            ReducerTest::new(TaskReducer::new())
                .with_env(create_test_env())
                .given_state(seeded_session())
                .when_action(action)
                .then_state(|state| {
                    assert_eq!(state, &seeded_session());
                })
                .then_effects(assertions::assert_no_effects)
                .run();
        }
    }

    #[test]
    fn test_delete_task() {
        ReducerTest::new(TaskReducer::new())
            .with_env(create_test_env())
            .given_state(seeded_session())
            .when_action(TaskAction::Delete { id: TaskId::new(1) })
            .then_state(|state| {
                assert_eq!(state.store.len(), 1);
                assert!(!state.store.contains(TaskId::new(1)));
            })
            .then_effects(assertions::assert_has_run_effect)
            .run();
    }

    #[test]
    fn test_deleting_edited_task_leaves_edit_mode() {
        ReducerTest::new(TaskReducer::new())
            .with_env(create_test_env())
            .given_state(seeded_session())
            .when_action(TaskAction::EditStart { id: TaskId::new(1) })
            .when_action(TaskAction::Delete { id: TaskId::new(1) })
            .then_state(|state| {
                assert_eq!(state.edit_mode, EditMode::Viewing);
            })
            .run();
    }

    #[test]
    fn test_deleting_other_task_keeps_edit_mode() {
        ReducerTest::new(TaskReducer::new())
            .with_env(create_test_env())
            .given_state(seeded_session())
            .when_action(TaskAction::EditStart { id: TaskId::new(1) })
            .when_action(TaskAction::Delete { id: TaskId::new(2) })
            .then_state(|state| {
                assert_eq!(state.edit_mode, EditMode::Editing(TaskId::new(1)));
            })
            .run();
    }

    #[test]
    fn test_edit_start_and_cancel() {
        ReducerTest::new(TaskReducer::new())
            .with_env(create_test_env())
            .given_state(seeded_session())
            .when_action(TaskAction::EditStart { id: TaskId::new(2) })
            .then_state(|state| {
                assert_eq!(state.edit_mode, EditMode::Editing(TaskId::new(2)));
            })
            .then_effects(assertions::assert_no_effects)
            .run();

        ReducerTest::new(TaskReducer::new())
            .with_env(create_test_env())
            .given_state(seeded_session())
            .when_actions([
                TaskAction::EditStart { id: TaskId::new(2) },
                TaskAction::EditCancel,
            ])
            .then_state(|state| {
                assert_eq!(state.edit_mode, EditMode::Viewing);
                assert_eq!(state.store, seeded_session().store);
            })
            .run();
    }

    #[test]
    fn test_edit_save_without_editor_is_ignored() {
        ReducerTest::new(TaskReducer::new())
            .with_env(create_test_env())
            .given_state(seeded_session())
            .when_action(TaskAction::EditSave {
                id: TaskId::new(1),
                text: "Changed behind the editor's back".to_string(),
                priority: Priority::Low,
            })
            .then_state(|state| {
                assert_eq!(state, &seeded_session());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_edit_save_for_other_task_keeps_editor_open() {
        ReducerTest::new(TaskReducer::new())
            .with_env(create_test_env())
            .given_state(seeded_session())
            .when_action(TaskAction::EditStart { id: TaskId::new(2) })
            .when_action(TaskAction::EditSave {
                id: TaskId::new(1),
                text: "Wrong task".to_string(),
                priority: Priority::Low,
            })
            .then_state(|state| {
                let task = state.store.get(TaskId::new(1)).unwrap();
                assert_eq!(task.text, "Welcome to your new To-Do App!");
                assert_eq!(state.edit_mode, EditMode::Editing(TaskId::new(2)));
                assert_eq!(state.last_error, None);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_edit_save_success() {
        ReducerTest::new(TaskReducer::new())
            .with_env(create_test_env())
            .given_state(seeded_session())
            .when_action(TaskAction::EditStart { id: TaskId::new(2) })
            .when_action(TaskAction::EditSave {
                id: TaskId::new(2),
                text: " Try editing too ".to_string(),
                priority: Priority::Low,
            })
            .then_state(|state| {
                let task = state.store.get(TaskId::new(2)).unwrap();
                assert_eq!(task.text, "Try editing too");
                assert_eq!(task.priority, Priority::Low);
                assert_eq!(state.edit_mode, EditMode::Viewing);
                // Position is unchanged
                assert_eq!(state.store.list()[1].id, TaskId::new(2));
            })
            .then_effects(assertions::assert_has_run_effect)
            .run();
    }

    // A rejected save still closes the editor
    #[test]
    fn test_edit_save_empty_text_exits_edit_mode() {
        ReducerTest::new(TaskReducer::new())
            .with_env(create_test_env())
            .given_state(seeded_session())
            .when_action(TaskAction::EditStart { id: TaskId::new(1) })
            .when_action(TaskAction::EditSave {
                id: TaskId::new(1),
                text: "   ".to_string(),
                priority: Priority::Low,
            })
            .then_state(|state| {
                let task = state.store.get(TaskId::new(1)).unwrap();
                assert_eq!(task.text, "Welcome to your new To-Do App!");
                assert_eq!(task.priority, Priority::High);
                assert_eq!(state.edit_mode, EditMode::Viewing);
                assert_eq!(state.last_error, Some(ValidationError::EmptyText));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_switching_edit_target_abandons_previous_edit() {
        ReducerTest::new(TaskReducer::new())
            .with_env(create_test_env())
            .given_state(seeded_session())
            .when_actions([
                TaskAction::EditStart { id: TaskId::new(1) },
                TaskAction::EditStart { id: TaskId::new(2) },
            ])
            .then_state(|state| {
                assert_eq!(state.edit_mode, EditMode::Editing(TaskId::new(2)));
                assert_eq!(state.store, seeded_session().store);
            })
            .run();
    }

    #[test]
    fn test_set_filter_does_not_touch_tasks() {
        ReducerTest::new(TaskReducer::new())
            .with_env(create_test_env())
            .given_state(seeded_session())
            .when_action(TaskAction::SetFilter {
                filter: FilterSelector::Completed,
            })
            .then_state(|state| {
                assert_eq!(state.filter, FilterSelector::Completed);
                assert_eq!(state.store, seeded_session().store);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_save_effect_reports_success() {
        let repository = Arc::new(InMemoryRepository::new());
        let env = TaskEnvironment::new(Arc::new(test_clock()), repository.clone());
        let mut state = seeded_session();

        let effects = TaskReducer::new().reduce(
            &mut state,
            TaskAction::Toggle { id: TaskId::new(1) },
            &env,
        );
        let Some(Effect::Run(thunk)) = effects.into_iter().next() else {
            panic!("expected a Run effect");
        };

        assert_eq!(thunk(), Some(TaskAction::TasksSaved { count: 2 }));
        assert_eq!(repository.save_count(), 1);
        let saved = repository.load().unwrap();
        assert!(saved.iter().any(|task| task.id == TaskId::new(1) && task.completed));
    }

    #[test]
    fn test_save_effect_reports_failure() {
        let env = TaskEnvironment::new(Arc::new(test_clock()), Arc::new(BrokenRepository));
        let mut state = seeded_session();

        let effects = TaskReducer::new().reduce(
            &mut state,
            TaskAction::Delete { id: TaskId::new(2) },
            &env,
        );
        let Some(Effect::Run(thunk)) = effects.into_iter().next() else {
            panic!("expected a Run effect");
        };

        assert_eq!(
            thunk(),
            Some(TaskAction::SaveFailed {
                error: "Storage error: disk full".to_string()
            })
        );
    }

    #[test]
    fn test_save_events_track_save_error() {
        ReducerTest::new(TaskReducer::new())
            .with_env(create_test_env())
            .given_state(Session::new(TaskStore::new()))
            .when_action(TaskAction::SaveFailed {
                error: "disk full".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.save_error.as_deref(), Some("disk full"));
            })
            .run();

        ReducerTest::new(TaskReducer::new())
            .with_env(create_test_env())
            .given_state(Session::new(TaskStore::new()))
            .when_actions([
                TaskAction::SaveFailed {
                    error: "disk full".to_string(),
                },
                TaskAction::TasksSaved { count: 0 },
            ])
            .then_state(|state| {
                assert!(state.save_error.is_none());
            })
            .run();
    }
}
