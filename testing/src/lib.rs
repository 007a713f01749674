//! # Load Forecasting Testing
//!
//! Testing utilities for the load forecasting client.
//!
//! This crate provides:
//! - `FixedClock` for deterministic session timestamps
//! - `ReducerTest`, a Given-When-Then harness for reducers
//! - `MockTransport`, a scripted HTTP transport with gated responses
//! - JSON fixtures shaped like the server's responses
//!
//! ## Example
//!
//! ```ignore
//! use loadforecast_testing::{fixtures, mock_api, MockTransport};
//! use loadforecast_client::HttpMethod;
//!
//! #[tokio::test]
//! async fn lists_projects() {
//!     let transport = MockTransport::new();
//!     transport.respond(HttpMethod::Get, "/api/projects/", 200, fixtures::projects_body(vec![]));
//!
//!     let api = mock_api(&transport);
//!     assert!(api.list_projects().await.unwrap().is_empty());
//! }
//! ```

use chrono::{DateTime, Utc};
use loadforecast_client::telemetry::LogOutput;
use loadforecast_core::environment::Clock;

pub mod fixtures;
pub mod transport;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use loadforecast_testing::mocks::FixedClock;
    /// use loadforecast_core::environment::Clock;
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

/// Install a test-friendly tracing subscriber once per process.
///
/// Output goes through the test harness writer, filtered by `RUST_LOG`
/// (default `warn`).
pub fn init_test_tracing() {
    loadforecast_client::telemetry::install("warn", LogOutput::TestHarness);
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};
pub use transport::{Gate, MockTransport, mock_api, mock_api_with};
