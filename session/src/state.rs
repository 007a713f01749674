//! Session state types.

use chrono::{DateTime, Utc};
use loadforecast_client::{User, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The signed-in user, as far as this process knows.
///
/// A fresh snapshot is taken every time the store enters Authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Account id.
    pub user_id: UserId,

    /// Login name, shown in the welcome banner and nav bar.
    pub username: String,

    /// Contact address, when the server sent one.
    pub email: Option<String>,

    /// When this process accepted the sign-in.
    pub authenticated_at: DateTime<Utc>,
}

impl Session {
    /// Snapshot `user` at `now`.
    #[must_use]
    pub fn from_user(user: User, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            email: user.email,
            authenticated_at: now,
        }
    }
}

/// Which kind of sign-in is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignIn {
    /// `POST /api/auth/login`
    Login,
    /// `POST /api/auth/register`
    Register,
}

/// The outstanding sign-in request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSignIn {
    /// Identifies the request and its result.
    pub correlation_id: Uuid,
    /// Login or registration.
    pub kind: SignIn,
}

/// State of the session store.
///
/// Authenticated exactly when `session` is present. Everything else is
/// bookkeeping for requests that are still running.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Current session, `None` when Anonymous.
    pub session: Option<Session>,

    /// At most one login/register in flight.
    pub pending: Option<PendingSignIn>,

    /// Startup restore in flight.
    pub restoring: Option<Uuid>,

    /// Request whose result produced `session`.
    pub established_by: Option<Uuid>,
}

impl SessionState {
    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Whether a login or registration is outstanding.
    #[must_use]
    pub const fn is_signing_in(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the session and abandon everything in flight.
    pub fn clear(&mut self) {
        self.session = None;
        self.pending = None;
        self.restoring = None;
        self.established_by = None;
    }

    /// Whether nothing is signed in and nothing is on its way.
    #[must_use]
    pub const fn is_idle_anonymous(&self) -> bool {
        self.session.is_none() && self.pending.is_none() && self.restoring.is_none()
    }
}
