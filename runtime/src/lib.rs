//! # Taskdeck Runtime
//!
//! Runtime implementation for the Taskdeck reducer architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that owns state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to the reducer
//!
//! Everything runs on the caller's thread. `send` reduces the action, runs
//! every effect it produced, reduces any actions those effects fed back, and
//! only then returns. The next action cannot start before the previous one
//! has fully settled.
//!
//! ## Example
//!
//! ```ignore
//! use taskdeck_runtime::Store;
//!
//! let mut store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething)?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

use std::collections::VecDeque;
use taskdeck_core::{effect::Effect, reducer::Reducer};

pub use error::StoreError;
pub use store::Store;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Effects kept feeding actions back past the configured bound
        ///
        /// State changes made before the bound was hit are kept; the
        /// remaining queued actions are dropped.
        #[error("Effect feedback exceeded {limit} actions")]
        FeedbackLimitExceeded {
            /// Configured bound on feedback actions per `send`
            limit: usize,
        },
    }
}

/// Configuration for Store behavior
///
/// # Example
///
/// ```
/// use taskdeck_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_max_feedback_actions(8);
/// assert_eq!(config.max_feedback_actions, 8);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum number of actions effects may feed back during a single `send`
    pub max_feedback_actions: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(max_feedback_actions: usize) -> Self {
        Self {
            max_feedback_actions,
        }
    }

    /// Set the feedback bound
    #[must_use]
    pub const fn with_max_feedback_actions(mut self, max: usize) -> Self {
        self.max_feedback_actions = max;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_feedback_actions: 64,
        }
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{Effect, Reducer, StoreConfig, StoreError, VecDeque};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store owns:
    /// 1. State (exclusively; only the reducer mutates it)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: S,
        reducer: R,
        environment: E,
        config: StoreConfig,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new store with a custom configuration
        #[must_use]
        pub const fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            Self {
                state: initial_state,
                reducer,
                environment,
                config,
            }
        }

        /// Send an action to the store
        ///
        /// Reduces the action, executes the returned effects in order, and
        /// reduces every action they feed back before returning.
        ///
        /// Returns the number of actions reduced, the initial one included.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::FeedbackLimitExceeded`] if effects feed back
        /// more actions than [`StoreConfig::max_feedback_actions`].
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub fn send(&mut self, action: A) -> Result<usize, StoreError> {
            let mut queue = VecDeque::from([action]);
            let mut processed = 0_usize;

            while let Some(action) = queue.pop_front() {
                if processed > self.config.max_feedback_actions {
                    tracing::warn!(
                        limit = self.config.max_feedback_actions,
                        dropped = queue.len() + 1,
                        "Effect feedback limit exceeded"
                    );
                    return Err(StoreError::FeedbackLimitExceeded {
                        limit: self.config.max_feedback_actions,
                    });
                }
                processed += 1;

                tracing::debug!("Processing action");
                metrics::counter!("store.commands.total").increment(1);

                let effects = {
                    let span = tracing::debug_span!("reducer_execution");
                    let _enter = span.enter();

                    let start = std::time::Instant::now();
                    let effects = self.reducer.reduce(&mut self.state, action, &self.environment);
                    metrics::histogram!("store.reducer.duration_seconds")
                        .record(start.elapsed().as_secs_f64());

                    tracing::trace!("Reducer completed, returned {} effects", effects.len());

                    // Note: Precision loss acceptable for metrics (effect counts < 2^52)
                    #[allow(clippy::cast_precision_loss)]
                    metrics::histogram!("store.effects.count").record(effects.len() as f64);

                    effects
                };

                for effect in effects {
                    Self::execute_effect(effect, &mut queue);
                }
            }

            tracing::debug!(processed, "Action processing completed");
            Ok(processed)
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let task_count = store.state(|s| s.tasks.len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            f(&self.state)
        }

        /// Access the injected environment
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// Consume the store and return its final state
        #[must_use]
        pub fn into_state(self) -> S {
            self.state
        }

        fn execute_effect(effect: Effect<A>, queue: &mut VecDeque<A>) {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                },
                Effect::Sequential(effects) => {
                    tracing::trace!("Executing Effect::Sequential with {} effects", effects.len());
                    for effect in effects {
                        Self::execute_effect(effect, queue);
                    }
                },
                Effect::Send(action) => {
                    tracing::trace!("Executing Effect::Send");
                    queue.push_back(*action);
                },
                Effect::Run(thunk) => {
                    tracing::trace!("Executing Effect::Run");
                    if let Some(action) = thunk() {
                        tracing::trace!("Effect::Run produced an action, queueing it");
                        queue.push_back(action);
                    }
                },
            }
        }
    }
}
