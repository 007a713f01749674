//! Session actions.
//!
//! Commands come from the facade; results come back from effects. Every
//! command carries a correlation id and so does its result, which is how
//! the facade finds its answer and how the reducer recognises results it
//! has abandoned.

use loadforecast_client::{AuthError, Password, User};
use uuid::Uuid;

/// Input to the session reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    // ═══════════════════════════════════════════════════════════════════════
    // Commands
    // ═══════════════════════════════════════════════════════════════════════
    /// Sign in with username and password.
    Login {
        /// Correlation ID for the result.
        correlation_id: Uuid,
        /// Login name.
        username: String,
        /// Password (redacted in `Debug`).
        password: Password,
    },

    /// Create an account; the server signs it in.
    Register {
        /// Correlation ID for the result.
        correlation_id: Uuid,
        /// Login name.
        username: String,
        /// Contact address.
        email: String,
        /// Password (redacted in `Debug`).
        password: Password,
    },

    /// Sign out. Anonymous immediately; the server call is best-effort.
    Logout {
        /// Correlation ID for the result.
        correlation_id: Uuid,
    },

    /// Ask the server who the stored credential belongs to.
    Restore {
        /// Correlation ID for the result.
        correlation_id: Uuid,
    },

    /// A resource fetch was rejected as unauthenticated.
    Expire,

    // ═══════════════════════════════════════════════════════════════════════
    // Results
    // ═══════════════════════════════════════════════════════════════════════
    /// Login or registration accepted.
    SignedIn {
        /// Correlation ID of the command.
        correlation_id: Uuid,
        /// The account.
        user: User,
    },

    /// Login or registration rejected, or refused before sending.
    SignInFailed {
        /// Correlation ID of the command.
        correlation_id: Uuid,
        /// Why.
        error: AuthError,
    },

    /// The logout call finished (or gave up).
    LoggedOut {
        /// Correlation ID of the command.
        correlation_id: Uuid,
        /// Server outcome; the session is gone either way.
        result: Result<(), AuthError>,
    },

    /// The restore call finished; `None` on any failure.
    Restored {
        /// Correlation ID of the command.
        correlation_id: Uuid,
        /// The account behind the stored credential.
        user: Option<User>,
    },
}
