//! Registration page.

use super::login::FILL_IN_ALL_FIELDS;
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

/// Shown when the confirmation differs from the password.
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";

/// Registration form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterState {
    /// Username field.
    pub username: String,
    /// Email field.
    pub email: String,
    /// Password field.
    pub password: Password,
    /// Confirmation field.
    pub confirm_password: Password,
    /// Outstanding submission.
    pub request: RequestTracker,
    /// Inline alert.
    pub alert: AlertSlot,
    /// Pending navigation.
    pub redirect: Option<Route>,
}

impl RegisterState {
    /// Whether the submit button is disabled.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.request.is_outstanding()
    }

    fn validation_error(&self) -> Option<&'static str> {
        if self.username.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Some(FILL_IN_ALL_FIELDS);
        }
        if self.password != self.confirm_password {
            return Some(PASSWORDS_DO_NOT_MATCH);
        }
        None
    }
}

/// Registration page input.
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterAction {
    /// Username typed.
    UsernameChanged(String),
    /// Email typed.
    EmailChanged(String),
    /// Password typed.
    PasswordChanged(Password),
    /// Confirmation typed.
    ConfirmPasswordChanged(Password),
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

impl PageState for RegisterState {
    fn redirect(&self) -> Option<Route> {
        self.redirect
    }

    fn alert(&self) -> &AlertSlot {
        &self.alert
    }
}

impl PageAction for RegisterAction {
    fn redirect_taken() -> Self {
        Self::RedirectTaken
    }

    fn unmount() -> Self {
        Self::Unmount
    }
}

/// Registration page logic.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegisterReducer;

impl Reducer for RegisterReducer {
    type State = RegisterState;
    type Action = RegisterAction;
    type Environment = ViewEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            RegisterAction::UsernameChanged(username) => {
                state.username = username;
                smallvec![Effect::None]
            },
            RegisterAction::EmailChanged(email) => {
                state.email = email;
                smallvec![Effect::None]
            },
            RegisterAction::PasswordChanged(password) => {
                state.password = password;
                smallvec![Effect::None]
            },
            RegisterAction::ConfirmPasswordChanged(password) => {
                state.confirm_password = password;
                smallvec![Effect::None]
            },
            RegisterAction::Submit => {
                if state.is_submitting() {
                    return smallvec![Effect::None];
                }
                if let Some(message) = state.validation_error() {
                    return smallvec![show_alert(
                        &mut state.alert,
                        AlertKind::Error,
                        message,
                        env,
                        RegisterAction::DismissAlert,
                    )];
                }
                let Some(token) = state.request.begin(()) else {
                    return smallvec![Effect::None];
                };
                state.alert.clear();

                let session = env.session.clone();
                let username = state.username.trim().to_string();
                let email = state.email.trim().to_string();
                let password = state.password.clone();
                smallvec![Effect::future(async move {
                    let result = session.register(&username, &email, &password).await;
                    Some(RegisterAction::Completed { token, result })
                })]
            },
            RegisterAction::Completed { token, result } => {
                if !state.request.finish(token) {
                    return smallvec![Effect::None];
                }
                match result {
                    Ok(_) => {
                        state.password = Password::default();
                        state.confirm_password = Password::default();
                        state.redirect = Some(Route::Dashboard);
                        smallvec![Effect::None]
                    },
                    Err(error) => smallvec![show_alert(
                        &mut state.alert,
                        AlertKind::Error,
                        error.user_message(),
                        env,
                        RegisterAction::DismissAlert,
                    )],
                }
            },
            RegisterAction::DismissAlert(id) => {
                state.alert.dismiss(id);
                smallvec![Effect::None]
            },
            RegisterAction::RedirectTaken => {
                state.redirect = None;
                smallvec![Effect::None]
            },
            RegisterAction::Unmount => {
                state.request.abandon();
                smallvec![Effect::None]
            },
        }
    }
}
