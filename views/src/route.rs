//! Navigation targets.

use loadforecast_client::ProjectId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A page the host can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/login`
    Login,
    /// `/register`
    Register,
    /// `/`
    Dashboard,
    /// `/projects`
    Projects,
    /// `/projects/new`
    NewProject,
    /// `/projects/:id`
    ProjectDetail(ProjectId),
}

impl Route {
    /// Whether only signed-in users may see it.
    #[must_use]
    pub const fn is_protected(self) -> bool {
        !matches!(self, Self::Login | Self::Register)
    }

    /// URL path of the route.
    #[must_use]
    pub fn path(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => f.write_str("/login"),
            Self::Register => f.write_str("/register"),
            Self::Dashboard => f.write_str("/"),
            Self::Projects => f.write_str("/projects"),
            Self::NewProject => f.write_str("/projects/new"),
            Self::ProjectDetail(id) => write!(f, "/projects/{id}"),
        }
    }
}

/// A path that names no page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no page at {0}")]
pub struct UnknownRoute(pub String);

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Ok(Self::Dashboard),
            "/login" => Ok(Self::Login),
            "/register" => Ok(Self::Register),
            "/projects" => Ok(Self::Projects),
            "/projects/new" => Ok(Self::NewProject),
            other => other
                .strip_prefix("/projects/")
                .and_then(|id| id.parse().ok())
                .map(Self::ProjectDetail)
                .ok_or_else(|| UnknownRoute(path.to_string())),
        }
    }
}
