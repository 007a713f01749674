//! Wire shapes of the REST API and their mapping to the domain model.
//!
//! Everything here is snake_case JSON as the server sends it. Conversion to
//! [`crate::model`] types happens once, in the `From` impls. A body whose
//! shape is wrong surfaces as a single `MalformedResponse`; a field the
//! server filled in unexpectedly (an unfamiliar status, no creation time)
//! is carried through rather than failing the whole response.

use crate::model::{NewProject, Project, ProjectId, ProjectStatus, ProjectUpdate, User, UserId};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A response body that could not be mapped to the domain model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct MappingError(pub String);

/// Decode `value` into the wire type `T`.
///
/// # Errors
///
/// Returns [`MappingError`] if the JSON does not have the expected shape.
pub fn decode<T: for<'de> Deserialize<'de>>(value: Value) -> Result<T, MappingError> {
    serde_json::from_value(value).map_err(|e| MappingError(e.to_string()))
}

// ═══════════════════════════════════════════════════════════════════════
// Responses
// ═══════════════════════════════════════════════════════════════════════

/// `{"user": {...}}` returned by login, register and profile.
#[derive(Debug, Deserialize)]
pub struct UserEnvelope {
    /// The account.
    pub user: WireUser,
}

/// `{"project": {...}}` returned by get, create and update.
#[derive(Debug, Deserialize)]
pub struct ProjectEnvelope {
    /// The project.
    pub project: WireProject,
}

/// `{"projects": [...]}` returned by list.
#[derive(Debug, Deserialize)]
pub struct ProjectListEnvelope {
    /// The projects, in server order. Missing means none.
    #[serde(default)]
    pub projects: Vec<WireProject>,
}

/// A user as serialized by the server.
#[derive(Debug, Deserialize)]
pub struct WireUser {
    /// Account id.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Contact address.
    #[serde(default)]
    pub email: Option<String>,
}

/// A project as serialized by the server.
#[derive(Debug, Deserialize)]
pub struct WireProject {
    /// Project id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Description, possibly empty.
    #[serde(default)]
    pub description: Option<String>,
    /// Data source, possibly empty.
    #[serde(default)]
    pub data_source: Option<String>,
    /// Status string.
    #[serde(default)]
    pub status: Option<String>,
    /// ISO-8601 timestamp, with or without offset.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Opaque model configuration.
    #[serde(default)]
    pub model_config: Option<Value>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Parse a server timestamp. Naive timestamps are taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

impl From<WireUser> for User {
    fn from(wire: WireUser) -> Self {
        Self {
            id: UserId(wire.id),
            username: wire.username,
            email: non_empty(wire.email),
        }
    }
}

impl From<WireProject> for Project {
    fn from(wire: WireProject) -> Self {
        let status = match wire.status.as_deref() {
            None | Some("") => ProjectStatus::Created,
            Some(raw) => ProjectStatus::parse(raw),
        };

        let created_at = wire.created_at.as_deref().and_then(|raw| {
            let parsed = parse_timestamp(raw);
            if parsed.is_none() {
                tracing::warn!(project = wire.id, raw, "Unreadable created_at");
            }
            parsed
        });

        Self {
            id: ProjectId(wire.id),
            name: wire.name,
            description: non_empty(wire.description),
            data_source: non_empty(wire.data_source),
            status,
            created_at,
            model_config: wire.model_config.filter(|config| !config.is_null()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Requests
// ═══════════════════════════════════════════════════════════════════════

/// Body of `POST /api/auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginBody<'a> {
    /// Login name.
    pub username: &'a str,
    /// Plain-text password.
    pub password: &'a str,
}

/// Body of `POST /api/auth/register`.
#[derive(Debug, Serialize)]
pub struct RegisterBody<'a> {
    /// Login name.
    pub username: &'a str,
    /// Contact address.
    pub email: &'a str,
    /// Plain-text password.
    pub password: &'a str,
}

/// Body of `POST /api/projects/`.
#[derive(Debug, Serialize)]
pub struct NewProjectBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_source: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_config: Option<&'a Value>,
}

impl<'a> From<&'a NewProject> for NewProjectBody<'a> {
    fn from(project: &'a NewProject) -> Self {
        Self {
            name: &project.name,
            description: project.description.as_deref(),
            data_source: project.data_source.as_deref(),
            model_config: project.model_config.as_ref(),
        }
    }
}

/// Body of `PUT /api/projects/:id`. Only changed fields are sent.
#[derive(Debug, Serialize)]
pub struct ProjectUpdateBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_source: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_config: Option<&'a Value>,
}

impl<'a> From<&'a ProjectUpdate> for ProjectUpdateBody<'a> {
    fn from(update: &'a ProjectUpdate) -> Self {
        Self {
            name: update.name.as_deref(),
            description: update.description.as_deref(),
            data_source: update.data_source.as_deref(),
            model_config: update.model_config.as_ref(),
        }
    }
}
