//! Project list.

use super::show_alert;
use crate::alert::{AlertKind, AlertSlot};
use crate::environment::ViewEnvironment;
use crate::page::{PageAction, PageState};
use crate::request::{RequestToken, RequestTracker};
use crate::route::Route;
use crate::view_state::{ViewState, failure_message};
use loadforecast_client::{FetchError, Project, ProjectId};
use loadforecast_core::effect::Effect;
use loadforecast_core::reducer::Reducer;
use loadforecast_core::{SmallVec, smallvec};

const LOAD_FAILED: &str = "Failed to load projects. Please try again later.";

/// Project list state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectsState {
    /// The user's projects, in server order.
    pub projects: ViewState<Vec<Project>>,
    /// Outstanding load.
    pub request: RequestTracker,
    /// Inline alert.
    pub alert: AlertSlot,
    /// Pending navigation.
    pub redirect: Option<Route>,
}

impl ProjectsState {
    /// Whether the "no projects yet" placeholder should show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.loaded().is_some_and(Vec::is_empty)
    }
}

/// Project list input.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectsAction {
    /// Page shown or refresh pressed.
    Load,
    /// Load finished.
    Loaded {
        /// Which load.
        token: RequestToken,
        /// Outcome.
        result: Result<Vec<Project>, FetchError>,
    },
    /// A row was clicked.
    Open(ProjectId),
    /// "New project" pressed.
    NewProject,
    /// Alert timer fired or close clicked.
    DismissAlert(u64),
    /// Host navigated.
    RedirectTaken,
    /// Page going away.
    Unmount,
}

impl PageState for ProjectsState {
    fn redirect(&self) -> Option<Route> {
        self.redirect
    }

    fn alert(&self) -> &AlertSlot {
        &self.alert
    }
}

impl PageAction for ProjectsAction {
    fn redirect_taken() -> Self {
        Self::RedirectTaken
    }

    fn unmount() -> Self {
        Self::Unmount
    }
}

/// Project list logic.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectsReducer;

impl Reducer for ProjectsReducer {
    type State = ProjectsState;
    type Action = ProjectsAction;
    type Environment = ViewEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ProjectsAction::Load => {
                let Some(token) = state.request.begin(()) else {
                    return smallvec![Effect::None];
                };
                state.projects = ViewState::Loading;

                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    let result = api.list_projects().await;
                    Some(ProjectsAction::Loaded { token, result })
                })]
            },
            ProjectsAction::Loaded { token, result } => {
                if !state.request.finish(token) {
                    return smallvec![Effect::None];
                }
                match result {
                    Ok(projects) => {
                        tracing::debug!(count = projects.len(), "Projects loaded");
                        state.projects = ViewState::Loaded(projects);
                        smallvec![Effect::None]
                    },
                    Err(error) => {
                        let message = failure_message(&error, LOAD_FAILED);
                        state.projects = ViewState::Failed(message.clone());
                        if error.is_unauthorized() {
                            state.redirect = Some(Route::Login);
                        }
                        smallvec![
                            env.on_fetch_error(&error),
                            show_alert(
                                &mut state.alert,
                                AlertKind::Error,
                                message,
                                env,
                                ProjectsAction::DismissAlert,
                            ),
                        ]
                    },
                }
            },
            ProjectsAction::Open(id) => {
                state.redirect = Some(Route::ProjectDetail(id));
                smallvec![Effect::None]
            },
            ProjectsAction::NewProject => {
                state.redirect = Some(Route::NewProject);
                smallvec![Effect::None]
            },
            ProjectsAction::DismissAlert(id) => {
                state.alert.dismiss(id);
                smallvec![Effect::None]
            },
            ProjectsAction::RedirectTaken => {
                state.redirect = None;
                smallvec![Effect::None]
            },
            ProjectsAction::Unmount => {
                state.request.abandon();
                smallvec![Effect::None]
            },
        }
    }
}
