//! # Load Forecasting API Client
//!
//! Typed access to the load forecasting REST API: authentication and the
//! project resource, over a single HTTP chokepoint that owns credentials,
//! timeouts and error mapping.
//!
//! ## Example
//!
//! ```no_run
//! use loadforecast_client::{ClientConfig, ForecastApi, Password};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env()?;
//!     let api = ForecastApi::from_config(&config)?;
//!
//!     let user = api.login("alice", &Password::new("secret")).await?;
//!     println!("Signed in as {}", user.username);
//!
//!     for project in api.list_projects().await? {
//!         println!("{} [{}]", project.name, project.status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Layers
//!
//! - [`http`]: transport seam, credential jar, `HttpError`
//! - [`wire`]: JSON shapes and mapping to [`model`]
//! - [`error`]: `FetchError` / `AuthError` with user-facing messages
//! - [`api`], [`auth`], [`projects`]: the endpoints

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod projects;
pub mod telemetry;
pub mod transport;
pub mod wire;

// Re-export main types for convenience
pub use api::ForecastApi;
pub use config::{ClientConfig, ConfigError};
pub use error::{AuthError, FetchError, FetchResult};
pub use http::{
    CredentialJar, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, HttpTransport,
    TransportError,
};
pub use model::{
    NewProject, Password, Project, ProjectId, ProjectStatus, ProjectUpdate, User, UserId,
};
pub use transport::ReqwestTransport;
