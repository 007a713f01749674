//! Login page.

use super::show_alert;
use crate::alert::{AlertKind, AlertSlot};
use crate::environment::ViewEnvironment;
use crate::page::{PageAction, PageState};
use crate::request::{RequestToken, RequestTracker};
use crate::route::Route;
use loadforecast_client::{AuthError, Password};
use loadforecast_core::effect::Effect;
use loadforecast_core::reducer::Reducer;
use loadforecast_core::{SmallVec, smallvec};
use loadforecast_session::Session;

/// Shown when a field is left empty.
pub const FILL_IN_ALL_FIELDS: &str = "Please fill in all fields";

/// Login form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginState {
    /// Username field.
    pub username: String,
    /// Password field.
    pub password: Password,
    /// Outstanding submission.
    pub request: RequestTracker,
    /// Inline alert.
    pub alert: AlertSlot,
    /// Pending navigation.
    pub redirect: Option<Route>,
}

impl LoginState {
    /// Whether the submit button is disabled.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.request.is_outstanding()
    }
}

/// Login page input.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginAction {
    /// Username typed.
    UsernameChanged(String),
    /// Password typed.
    PasswordChanged(Password),
    /// Submit pressed.
    Submit,
    /// The session store answered.
    Completed {
        /// Which submission.
        token: RequestToken,
        /// Outcome.
        result: Result<Session, AuthError>,
    },
    /// Alert timer fired or close clicked.
    DismissAlert(u64),
    /// Host navigated.
    RedirectTaken,
    /// Page going away.
    Unmount,
}

impl PageState for LoginState {
    fn redirect(&self) -> Option<Route> {
        self.redirect
    }

    fn alert(&self) -> &AlertSlot {
        &self.alert
    }
}

impl PageAction for LoginAction {
    fn redirect_taken() -> Self {
        Self::RedirectTaken
    }

    fn unmount() -> Self {
        Self::Unmount
    }
}

/// Login page logic.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoginReducer;

impl Reducer for LoginReducer {
    type State = LoginState;
    type Action = LoginAction;
    type Environment = ViewEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            LoginAction::UsernameChanged(username) => {
                state.username = username;
                smallvec![Effect::None]
            },
            LoginAction::PasswordChanged(password) => {
                state.password = password;
                smallvec![Effect::None]
            },
            LoginAction::Submit => {
                if state.is_submitting() {
                    return smallvec![Effect::None];
                }
                if state.username.trim().is_empty() || state.password.is_empty() {
                    return smallvec![show_alert(
                        &mut state.alert,
                        AlertKind::Error,
                        FILL_IN_ALL_FIELDS,
                        env,
                        LoginAction::DismissAlert,
                    )];
                }
                let Some(token) = state.request.begin(()) else {
                    return smallvec![Effect::None];
                };
                state.alert.clear();

                let session = env.session.clone();
                let username = state.username.trim().to_string();
                let password = state.password.clone();
                smallvec![Effect::future(async move {
                    let result = session.login(&username, &password).await;
                    Some(LoginAction::Completed { token, result })
                })]
            },
            LoginAction::Completed { token, result } => {
                if !state.request.finish(token) {
                    return smallvec![Effect::None];
                }
                match result {
                    Ok(session) => {
                        tracing::debug!(user_id = %session.user_id, "Login page signed in");
                        state.password = Password::default();
                        state.redirect = Some(Route::Dashboard);
                        smallvec![Effect::None]
                    },
                    Err(error) => smallvec![show_alert(
                        &mut state.alert,
                        AlertKind::Error,
                        error.user_message(),
                        env,
                        LoginAction::DismissAlert,
                    )],
                }
            },
            LoginAction::DismissAlert(id) => {
                state.alert.dismiss(id);
                smallvec![Effect::None]
            },
            LoginAction::RedirectTaken => {
                state.redirect = None;
                smallvec![Effect::None]
            },
            LoginAction::Unmount => {
                state.request.abandon();
                smallvec![Effect::None]
            },
        }
    }
}
