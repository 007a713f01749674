//! Session environment.

use loadforecast_client::ForecastApi;
use loadforecast_core::environment::{Clock, SystemClock};
use std::sync::Arc;

/// Dependencies of the session reducer.
#[derive(Clone)]
pub struct SessionEnvironment {
    /// API client; its credential jar is the one cleared on logout.
    pub api: ForecastApi,

    /// Stamps new sessions.
    pub clock: Arc<dyn Clock>,
}

impl SessionEnvironment {
    /// Environment with the wall clock.
    #[must_use]
    pub fn new(api: ForecastApi) -> Self {
        Self {
            api,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl std::fmt::Debug for SessionEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEnvironment")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}
