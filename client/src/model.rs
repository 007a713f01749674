//! Domain types used throughout the client.
//!
//! These are the semantic names the rest of the workspace works with. The
//! snake_case wire shapes live in [`crate::wire`] and are converted at the
//! boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Server-assigned identifier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-assigned identifier of a forecasting project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectId(pub i64);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProjectId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Accounts
// ═══════════════════════════════════════════════════════════════════════

/// A user account as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account id.
    pub id: UserId,

    /// Login name.
    pub username: String,

    /// Contact address, when the server includes it.
    pub email: Option<String>,
}

/// A password held only long enough to send it.
///
/// `Debug` is redacted so actions carrying a password can be traced safely.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Password(String);

impl Password {
    /// Wrap a plain-text password.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The plain-text value, for the request body only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether nothing was typed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

impl From<&str> for Password {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Projects
// ═══════════════════════════════════════════════════════════════════════

/// Processing status of a project.
///
/// Transitions are driven by the server; the client only displays them.
/// The server's pipeline also writes statuses of its own (`"Ready"`,
/// `"DataUploaded"`...), which are kept verbatim as [`Other`](Self::Other).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectStatus {
    /// Created, no data processed yet.
    Created,
    /// Data ingestion or model training in progress.
    Processing,
    /// Forecast available.
    Completed,
    /// The pipeline failed.
    Failed,
    /// Any other status string, as the server sent it.
    Other(String),
}

impl ProjectStatus {
    /// Map a server status string. Known names match case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "created" => Self::Created,
            "processing" => Self::Processing,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    /// Wire spelling of the status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "created",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Other(raw) => raw,
        }
    }

    /// Created or processing.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Created | Self::Processing)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for ProjectStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<ProjectStatus> for String {
    fn from(status: ProjectStatus) -> Self {
        match status {
            ProjectStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// A forecasting project. Read-only copy of server state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project id.
    pub id: ProjectId,

    /// Display name.
    pub name: String,

    /// Free-form description.
    pub description: Option<String>,

    /// URL or path the server loads data from.
    pub data_source: Option<String>,

    /// Current processing status.
    pub status: ProjectStatus,

    /// Creation time (UTC); `None` when the server never set it.
    pub created_at: Option<DateTime<Utc>>,

    /// Model configuration, stored by the server as opaque JSON.
    pub model_config: Option<serde_json::Value>,
}

/// Input for `create_project`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewProject {
    /// Required, non-empty. Checked by the caller before sending.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional data source.
    pub data_source: Option<String>,
    /// Optional model configuration.
    pub model_config: Option<serde_json::Value>,
}

impl NewProject {
    /// A project with just a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the data source.
    #[must_use]
    pub fn with_data_source(mut self, data_source: impl Into<String>) -> Self {
        self.data_source = Some(data_source.into());
        self
    }

    /// Set the model configuration.
    #[must_use]
    pub fn with_model_config(mut self, config: serde_json::Value) -> Self {
        self.model_config = Some(config);
        self
    }
}

/// Partial update for `update_project`. `None` fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectUpdate {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New data source.
    pub data_source: Option<String>,
    /// New model configuration.
    pub model_config: Option<serde_json::Value>,
}

impl ProjectUpdate {
    /// Whether the update would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.data_source.is_none()
            && self.model_config.is_none()
    }
}
