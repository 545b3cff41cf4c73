//! # Taskdeck Testing
//!
//! Testing utilities and helpers for the Taskdeck reducer architecture.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use taskdeck_testing::{ReducerTest, test_clock};
//!
//! ReducerTest::new(TaskReducer::new())
//!     .with_env(test_environment())
//!     .given_state(Session::default())
//!     .when_action(TaskAction::Add { text: "Buy milk".into(), priority: Priority::Low })
//!     .then_state(|session| assert_eq!(session.store.len(), 1))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use taskdeck_core::environment::Clock;


/// Deterministic clocks for tests
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::Mutex;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use taskdeck_testing::mocks::FixedClock;
    /// use taskdeck_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that advances by a fixed step every time it is read
    ///
    /// Useful when a test needs distinct, ordered creation timestamps.
    ///
    /// ```
    /// use taskdeck_testing::mocks::SteppingClock;
    /// use taskdeck_core::environment::Clock;
    /// use chrono::{TimeDelta, Utc};
    ///
    /// let start = Utc::now();
    /// let clock = SteppingClock::new(start, TimeDelta::minutes(1));
    /// assert_eq!(clock.now(), start);
    /// assert_eq!(clock.now(), start + TimeDelta::minutes(1));
    /// ```
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: chrono::TimeDelta,
    }

    impl SteppingClock {
        /// Create a clock starting at `start` and advancing by `step` per read
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: chrono::TimeDelta) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut next = match self.next.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let current = *next;
            *next = current + self.step;
            current
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Test helpers and utilities
pub mod helpers {
    /// Install a `tracing` subscriber that writes through the test harness
    ///
    /// Honors `RUST_LOG`. Safe to call from every test; only the first call
    /// installs anything.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use helpers::init_test_tracing;
pub use mocks::{FixedClock, SteppingClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};
