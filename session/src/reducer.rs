//! Session reducer.
//!
//! `Anonymous -> Authenticated` on a successful login, registration or
//! restore; `Authenticated -> Anonymous` on logout or expiry. Results whose
//! correlation id no longer matches what the state is waiting for are
//! ignored.

use crate::actions::SessionAction;
use crate::environment::SessionEnvironment;
use crate::state::{PendingSignIn, Session, SessionState, SignIn};
use loadforecast_client::AuthError;
use loadforecast_core::effect::Effect;
use loadforecast_core::reducer::Reducer;
use loadforecast_core::{SmallVec, smallvec};

/// Reducer behind [`SessionStore`](crate::SessionStore).
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionReducer;

impl SessionReducer {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn refuse(correlation_id: uuid::Uuid, error: AuthError) -> Effect<SessionAction> {
    Effect::future(async move {
        Some(SessionAction::SignInFailed {
            correlation_id,
            error,
        })
    })
}

/// Credentials change under the store's write lock, in the same step as the
/// state they belong to, so no later sign-in can be overtaken.
fn clear_credentials(env: &SessionEnvironment) {
    env.api.http().credentials().clear();
}

impl Reducer for SessionReducer {
    type State = SessionState;
    type Action = SessionAction;
    type Environment = SessionEnvironment;

    #[allow(clippy::too_many_lines)] // one arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            SessionAction::Login {
                correlation_id,
                username,
                password,
            } => {
                if state.pending.is_some() {
                    tracing::warn!("Login refused: another sign-in is in flight");
                    return smallvec![refuse(correlation_id, AuthError::RequestInFlight)];
                }
                state.pending = Some(PendingSignIn {
                    correlation_id,
                    kind: SignIn::Login,
                });

                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    Some(match api.login(&username, &password).await {
                        Ok(user) => SessionAction::SignedIn {
                            correlation_id,
                            user,
                        },
                        Err(error) => SessionAction::SignInFailed {
                            correlation_id,
                            error,
                        },
                    })
                })]
            },

            SessionAction::Register {
                correlation_id,
                username,
                email,
                password,
            } => {
                if state.pending.is_some() {
                    tracing::warn!("Registration refused: another sign-in is in flight");
                    return smallvec![refuse(correlation_id, AuthError::RequestInFlight)];
                }
                state.pending = Some(PendingSignIn {
                    correlation_id,
                    kind: SignIn::Register,
                });

                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    Some(match api.register(&username, &email, &password).await {
                        Ok(user) => SessionAction::SignedIn {
                            correlation_id,
                            user,
                        },
                        Err(error) => SessionAction::SignInFailed {
                            correlation_id,
                            error,
                        },
                    })
                })]
            },

            SessionAction::SignedIn {
                correlation_id,
                user,
            } => {
                if state.pending.map(|p| p.correlation_id) != Some(correlation_id) {
                    tracing::debug!(%correlation_id, "Discarding abandoned sign-in result");
                    // The server issued a credential nobody wants any more
                    if state.is_idle_anonymous() {
                        clear_credentials(env);
                    }
                    return smallvec![Effect::None];
                }

                tracing::info!(user_id = %user.id, "Session established");
                state.pending = None;
                state.restoring = None;
                state.session = Some(Session::from_user(user, env.clock.now()));
                state.established_by = Some(correlation_id);
                smallvec![Effect::None]
            },

            SessionAction::SignInFailed {
                correlation_id,
                error,
            } => {
                if state.pending.map(|p| p.correlation_id) == Some(correlation_id) {
                    tracing::warn!(%error, "Sign-in rejected");
                    state.pending = None;
                }
                smallvec![Effect::None]
            },

            SessionAction::Logout { correlation_id } => {
                if let Some(session) = &state.session {
                    tracing::info!(user_id = %session.user_id, "Logging out");
                }
                state.clear();
                let credential = env.api.detach_credential();

                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    let result = api.logout_with(credential).await;
                    Some(SessionAction::LoggedOut {
                        correlation_id,
                        result,
                    })
                })]
            },

            SessionAction::LoggedOut { result, .. } => {
                if let Err(error) = result {
                    tracing::debug!(%error, "Server-side logout failed");
                }
                smallvec![Effect::None]
            },

            SessionAction::Restore { correlation_id } => {
                if state.session.is_some() {
                    // Already signed in; the caller reads the current session
                    return smallvec![Effect::future(async move {
                        Some(SessionAction::Restored {
                            correlation_id,
                            user: None,
                        })
                    })];
                }
                state.restoring = Some(correlation_id);

                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    let user = match api.profile().await {
                        Ok(user) => Some(user),
                        Err(error) => {
                            tracing::debug!(%error, "No session to restore");
                            None
                        },
                    };
                    Some(SessionAction::Restored {
                        correlation_id,
                        user,
                    })
                })]
            },

            SessionAction::Restored {
                correlation_id,
                user,
            } => {
                if state.restoring != Some(correlation_id) {
                    return smallvec![Effect::None];
                }
                state.restoring = None;

                match user {
                    Some(user) if state.session.is_none() => {
                        tracing::info!(user_id = %user.id, "Session restored");
                        state.session = Some(Session::from_user(user, env.clock.now()));
                        state.established_by = Some(correlation_id);
                    },
                    _ => {},
                }
                smallvec![Effect::None]
            },

            SessionAction::Expire => {
                if let Some(session) = state.session.take() {
                    tracing::warn!(user_id = %session.user_id, "Session expired");
                }
                state.established_by = None;
                state.restoring = None;
                clear_credentials(env);
                smallvec![Effect::None]
            },
        }
    }
}
