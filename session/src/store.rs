//! Async facade over the session reducer.

use crate::actions::SessionAction;
use crate::environment::SessionEnvironment;
use crate::reducer::SessionReducer;
use crate::state::{Session, SessionState};
use loadforecast_client::{AuthError, ForecastApi, Password};
use loadforecast_runtime::{Store, StoreError};
use std::time::Duration;
use uuid::Uuid;

/// Slack on top of the HTTP timeouts before a caller stops waiting.
const RESULT_GRACE: Duration = Duration::from_secs(5);

/// The Store running the session reducer.
pub type SessionRuntime = Store<SessionState, SessionAction, SessionEnvironment, SessionReducer>;

/// The one session store of a process.
///
/// Clones share state. Pages receive a clone through their environment.
///
/// # Example
///
/// ```ignore
/// let session = SessionStore::new(SessionEnvironment::new(api));
/// session.restore_session().await;
///
/// let signed_in = session.login("alice", &Password::new("secret")).await?;
/// assert!(session.is_authenticated().await);
/// ```
#[derive(Clone)]
pub struct SessionStore {
    store: SessionRuntime,
    api: ForecastApi,
    wait_timeout: Duration,
}

fn store_error(error: StoreError) -> AuthError {
    match error {
        StoreError::Timeout => AuthError::Timeout,
        StoreError::ShutdownInProgress | StoreError::ChannelClosed => AuthError::Cancelled,
    }
}

impl SessionStore {
    /// Start an Anonymous session store.
    #[must_use]
    pub fn new(environment: SessionEnvironment) -> Self {
        let api = environment.api.clone();
        let wait_timeout = api.http().timeout() + api.logout_timeout() + RESULT_GRACE;
        Self {
            store: Store::new(SessionState::default(), SessionReducer::new(), environment),
            api,
            wait_timeout,
        }
    }

    /// The API client whose credential this store manages.
    #[must_use]
    pub const fn api(&self) -> &ForecastApi {
        &self.api
    }

    /// Sign in.
    ///
    /// # Errors
    ///
    /// The server's rejection, a transport failure,
    /// [`AuthError::RequestInFlight`] if another sign-in is outstanding, or
    /// [`AuthError::Cancelled`] if a logout overtook it.
    pub async fn login(&self, username: &str, password: &Password) -> Result<Session, AuthError> {
        let correlation_id = Uuid::new_v4();
        self.sign_in(
            correlation_id,
            SessionAction::Login {
                correlation_id,
                username: username.to_string(),
                password: password.clone(),
            },
        )
        .await
    }

    /// Create an account and sign it in.
    ///
    /// Password confirmation is the caller's job.
    ///
    /// # Errors
    ///
    /// As for [`login`](Self::login).
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &Password,
    ) -> Result<Session, AuthError> {
        let correlation_id = Uuid::new_v4();
        self.sign_in(
            correlation_id,
            SessionAction::Register {
                correlation_id,
                username: username.to_string(),
                email: email.to_string(),
                password: password.clone(),
            },
        )
        .await
    }

    async fn sign_in(
        &self,
        correlation_id: Uuid,
        action: SessionAction,
    ) -> Result<Session, AuthError> {
        let result = self
            .store
            .send_and_wait_for(
                action,
                move |a| {
                    matches!(
                        a,
                        SessionAction::SignedIn { correlation_id: id, .. }
                            | SessionAction::SignInFailed { correlation_id: id, .. }
                            if *id == correlation_id
                    )
                },
                self.wait_timeout,
            )
            .await
            .map_err(store_error)?;

        if let SessionAction::SignInFailed { error, .. } = result {
            return Err(error);
        }

        // Results are reduced before they are observed, so the session is
        // ours unless a logout (or a later sign-in) replaced it
        self.store
            .state(|s| {
                (s.established_by == Some(correlation_id))
                    .then(|| s.session.clone())
                    .flatten()
            })
            .await
            .ok_or(AuthError::Cancelled)
    }

    /// Sign out.
    ///
    /// The session and credential are gone when this returns, whatever the
    /// server said.
    ///
    /// # Errors
    ///
    /// Reports a failed or timed-out server call; nothing to act on.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let correlation_id = Uuid::new_v4();
        let result = self
            .store
            .send_and_wait_for(
                SessionAction::Logout { correlation_id },
                move |a| {
                    matches!(a, SessionAction::LoggedOut { correlation_id: id, .. } if *id == correlation_id)
                },
                self.wait_timeout,
            )
            .await
            .map_err(store_error)?;

        match result {
            SessionAction::LoggedOut { result, .. } => result,
            _ => Ok(()),
        }
    }

    /// Recover a session from a stored credential. Call once at startup.
    ///
    /// Never fails: anything but a valid profile leaves the store Anonymous.
    pub async fn restore_session(&self) -> Option<Session> {
        let correlation_id = Uuid::new_v4();
        if let Err(error) = self
            .store
            .send_and_wait_for(
                SessionAction::Restore { correlation_id },
                move |a| {
                    matches!(a, SessionAction::Restored { correlation_id: id, .. } if *id == correlation_id)
                },
                self.wait_timeout,
            )
            .await
        {
            tracing::debug!(%error, "Session restore did not complete");
        }
        self.current().await
    }

    /// Drop the session after the server rejected its credential.
    pub async fn expire(&self) {
        match self.store.send(SessionAction::Expire).await {
            Ok(mut handle) => handle.wait().await,
            Err(error) => tracing::debug!(%error, "Expire ignored"),
        }
    }

    /// Snapshot of the current session.
    pub async fn current(&self) -> Option<Session> {
        self.store.state(|s| s.session.clone()).await
    }

    /// Whether a user is signed in.
    pub async fn is_authenticated(&self) -> bool {
        self.store.state(SessionState::is_authenticated).await
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("wait_timeout", &self.wait_timeout)
            .finish_non_exhaustive()
    }
}
