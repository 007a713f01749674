//! Dependencies handed to every page.

use loadforecast_client::{ClientConfig, FetchError, ForecastApi};
use loadforecast_core::effect::Effect;
use loadforecast_session::SessionStore;
use std::time::Duration;

/// What a page may talk to. Passed in explicitly at mount.
#[derive(Debug, Clone)]
pub struct ViewEnvironment {
    /// API client sharing the session store's credential.
    pub api: ForecastApi,

    /// The process's session store.
    pub session: SessionStore,

    /// How long alerts stay up.
    pub alert_dismiss_after: Duration,
}

impl ViewEnvironment {
    /// Environment over `session`, reusing its API client.
    #[must_use]
    pub fn new(session: SessionStore) -> Self {
        Self {
            api: session.api().clone(),
            session,
            alert_dismiss_after: ClientConfig::default().alert_dismiss_after,
        }
    }

    /// Override the alert auto-dismiss delay.
    #[must_use]
    pub const fn with_alert_dismiss_after(mut self, delay: Duration) -> Self {
        self.alert_dismiss_after = delay;
        self
    }

    /// Effect that drops the session after an `Unauthorized` response.
    pub fn expire_session<A: Send + 'static>(&self) -> Effect<A> {
        let session = self.session.clone();
        Effect::future(async move {
            session.expire().await;
            None
        })
    }

    /// Effect for the fallout of a failed fetch: expire on `Unauthorized`.
    pub fn on_fetch_error<A: Send + 'static>(&self, error: &FetchError) -> Effect<A> {
        if error.is_unauthorized() {
            self.expire_session()
        } else {
            Effect::None
        }
    }
}
