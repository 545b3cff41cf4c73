//! In-memory task list built on the Taskdeck reducer architecture.
//!
//! Tasks carry a short text, a priority label and a completion flag. User
//! intents are dispatched as [`TaskAction`]s to a [`TaskReducer`], which keeps
//! the [`Session`] (task collection, active filter and inline editor) up to
//! date. Renderers never read the session directly; they consume the
//! [`ViewModel`] a [`ViewProjector`] derives from it.
//!
//! - [`store`]: the task collection and its mutation rules
//! - [`view`]: filtering, counters and display entries
//! - [`reducer`]: intent handling and the edit-mode state machine
//! - [`render`]: plain text and HTML output
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use taskdeck::{
//!     FilterSelector, InMemoryRepository, Priority, Session, TaskAction, TaskEnvironment,
//!     TaskReducer, TaskStore, ViewProjector,
//! };
//! use taskdeck_core::environment::SystemClock;
//! use taskdeck_runtime::Store;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let env = TaskEnvironment::new(Arc::new(SystemClock), Arc::new(InMemoryRepository::new()));
//! let mut store = Store::new(Session::new(TaskStore::new()), TaskReducer::new(), env);
//!
//! store.send(TaskAction::Add {
//!     text: "Buy milk".to_string(),
//!     priority: Priority::Low,
//! })?;
//! store.send(TaskAction::SetFilter {
//!     filter: FilterSelector::Completed,
//! })?;
//!
//! let view = store.state(|session| session.view(&ViewProjector::default()));
//! assert_eq!(view.counts.total, 1);
//! assert!(view.empty);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod persistence;
pub mod reducer;
pub mod render;
pub mod session;
pub mod store;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use config::TaskdeckConfig;
pub use error::{ConfigError, ParseError, PersistenceError, ValidationError};
pub use persistence::{InMemoryRepository, SeededRepository, TaskRepository};
pub use reducer::{TaskEnvironment, TaskReducer};
pub use session::{EditMode, Session};
pub use store::TaskStore;
pub use types::{FilterSelector, Priority, Task, TaskAction, TaskId};
pub use view::{TaskEntry, ViewModel, ViewProjector};
