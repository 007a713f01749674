//! The load forecasting API client.
//!
//! [`ForecastApi`] is cheap to clone; every clone shares the same transport
//! and credential jar. Auth calls live in [`crate::auth`], project calls in
//! [`crate::projects`].

use crate::config::{ClientConfig, ConfigError};
use crate::http::{HttpClient, HttpTransport};
use crate::transport::ReqwestTransport;
use std::sync::Arc;
use std::time::Duration;

/// Typed access to the REST API.
#[derive(Debug, Clone)]
pub struct ForecastApi {
    pub(crate) http: HttpClient,
    pub(crate) logout_timeout: Duration,
}

impl ForecastApi {
    /// Create an API client over an existing HTTP client.
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            logout_timeout: ClientConfig::default().logout_timeout,
        }
    }

    /// Create an API client that talks to the configured server.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is invalid.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Create an API client over any transport, using the configured timeouts.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn HttpTransport>, config: &ClientConfig) -> Self {
        Self::new(HttpClient::new(transport, config.request_timeout))
            .with_logout_timeout(config.logout_timeout)
    }

    /// Override the bound on the logout call.
    #[must_use]
    pub const fn with_logout_timeout(mut self, timeout: Duration) -> Self {
        self.logout_timeout = timeout;
        self
    }

    /// Bound on the logout call.
    #[must_use]
    pub const fn logout_timeout(&self) -> Duration {
        self.logout_timeout
    }

    /// The underlying HTTP client.
    #[must_use]
    pub const fn http(&self) -> &HttpClient {
        &self.http
    }
}
