//! # Book Fair Testing
//!
//! Testing utilities for the book fair portal reducers.
//!
//! This crate provides:
//! - Deterministic clocks for the `Clock` environment trait
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use bookfair_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(BookingReducer::new())
//!     .with_env(test_environment())
//!     .given_state(portal_with_catalog())
//!     .when_action(BookingAction::ToggleStall { stall_id: "A01".parse()? })
//!     .then_state(|state| assert_eq!(state.booking.selection.len(), 1))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use chrono::{DateTime, Duration, Utc};
use bookfair_core::environment::Clock;
use std::sync::Mutex;


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Duration, Mutex, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use bookfair_testing::mocks::FixedClock;
    /// use bookfair_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
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

    /// Clock that advances by a fixed step on every read
    ///
    /// Useful when a test needs strictly increasing timestamps, e.g. to
    /// check that reservations are listed in booking order.
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        /// Start at `start` and advance by `step` after each read
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
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

    /// Opening day of the fair (2025-09-15 00:00:00 UTC)
    #[must_use]
    pub fn fair_opening() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_757_894_400, 0).unwrap_or_default()
    }

    /// Default fixed clock for tests, pinned to [`fair_opening`]
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(fair_opening())
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, SteppingClock, test_clock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_is_stable() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now(), mocks::fair_opening());
    }

    #[test]
    fn stepping_clock_advances() {
        let start = mocks::fair_opening();
        let clock = SteppingClock::new(start, Duration::minutes(5));

        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start + Duration::minutes(5));
        assert_eq!(clock.now(), start + Duration::minutes(10));
    }
}
