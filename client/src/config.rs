//! Client configuration.
//!
//! Defaults suit a development server on localhost. [`ClientConfig::from_env`]
//! overrides them from the environment after loading an optional `.env`.

use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the API base URL.
pub const API_URL_VAR: &str = "LOADFORECAST_API_URL";
/// Environment variable holding the request timeout in seconds.
pub const REQUEST_TIMEOUT_VAR: &str = "LOADFORECAST_REQUEST_TIMEOUT_SECS";
/// Environment variable holding the logout timeout in seconds.
pub const LOGOUT_TIMEOUT_VAR: &str = "LOADFORECAST_LOGOUT_TIMEOUT_SECS";
/// Environment variable holding the alert auto-dismiss delay in seconds.
pub const ALERT_DISMISS_VAR: &str = "LOADFORECAST_ALERT_DISMISS_SECS";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The base URL does not parse or is not http(s).
    #[error("invalid API base URL {url:?}: {reason}")]
    InvalidBaseUrl {
        /// The rejected value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A duration variable is not a whole number of seconds.
    #[error("invalid value {value:?} for {var}: expected whole seconds")]
    InvalidDuration {
        /// Variable name.
        var: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Transport(String),
}

/// Settings for talking to the load forecasting API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:5000`.
    pub base_url: String,
    /// Timeout for ordinary requests.
    pub request_timeout: Duration,
    /// Bound on the best-effort logout call.
    pub logout_timeout: Duration,
    /// How long an alert stays before dismissing itself.
    pub alert_dismiss_after: Duration,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout: Duration::from_secs(30),
            logout_timeout: Duration::from_secs(5),
            alert_dismiss_after: Duration::from_secs(5),
            user_agent: concat!("loadforecast-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Build a configuration from the environment.
    ///
    /// Loads `.env` if present, then reads [`API_URL_VAR`],
    /// [`REQUEST_TIMEOUT_VAR`], [`LOGOUT_TIMEOUT_VAR`] and
    /// [`ALERT_DISMISS_VAR`]. Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_VAR) {
            config.base_url = url;
        }
        if let Some(timeout) = seconds(&lookup, REQUEST_TIMEOUT_VAR)? {
            config.request_timeout = timeout;
        }
        if let Some(timeout) = seconds(&lookup, LOGOUT_TIMEOUT_VAR)? {
            config.logout_timeout = timeout;
        }
        if let Some(delay) = seconds(&lookup, ALERT_DISMISS_VAR)? {
            config.alert_dismiss_after = delay;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parsed base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute http(s) URL.
    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason,
        };
        let url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(format!("unsupported scheme {other}"))),
        }
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parsed_base_url().map(|_| ())
    }
}

fn seconds<F>(lookup: &F, var: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidDuration { var, value })
        })
        .transpose()
}
