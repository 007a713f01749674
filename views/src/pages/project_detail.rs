//! Project detail: load, edit and delete one project.
//!
//! Loads are keyed by project id. Asking for the id already in flight is a
//! no-op; asking for another id supersedes it, and the older response is
//! dropped when it arrives. Update and delete share a second tracker so at
//! most one mutation is outstanding.

use super::show_alert;
use crate::alert::{AlertKind, AlertSlot};
use crate::environment::ViewEnvironment;
use crate::page::{PageAction, PageState};
use crate::request::{RequestToken, RequestTracker};
use crate::route::Route;
use crate::view_state::{ViewState, failure_message};
use loadforecast_client::{FetchError, Project, ProjectId, ProjectUpdate};
use loadforecast_core::effect::Effect;
use loadforecast_core::reducer::Reducer;
use loadforecast_core::{SmallVec, smallvec};

const LOAD_FAILED: &str = "Failed to load project details";
const UPDATE_FAILED: &str = "Failed to update project";
const DELETE_FAILED: &str = "Failed to delete project";

/// Shown after a successful update.
pub const PROJECT_UPDATED: &str = "Project updated successfully";

/// What the mutation tracker is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Saving edits.
    Update,
    /// Deleting the project.
    Delete,
}

/// Project detail state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectDetailState {
    /// The id last asked for.
    pub project_id: Option<ProjectId>,
    /// The project.
    pub project: ViewState<Project>,
    /// Outstanding load, keyed by id.
    pub load: RequestTracker<ProjectId>,
    /// Outstanding update or delete.
    pub mutation: RequestTracker<Mutation>,
    /// Inline alert.
    pub alert: AlertSlot,
    /// Pending navigation.
    pub redirect: Option<Route>,
}

impl ProjectDetailState {
    /// Whether an update or delete is outstanding.
    #[must_use]
    pub const fn is_mutating(&self) -> bool {
        self.mutation.is_outstanding()
    }
}

/// Project detail input.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectDetailAction {
    /// Show the project with this id.
    Load(ProjectId),
    /// Load finished.
    Loaded {
        /// Which load.
        token: RequestToken,
        /// Outcome.
        result: Result<Project, FetchError>,
    },
    /// Save edits to the shown project.
    Update(ProjectUpdate),
    /// Update finished.
    Updated {
        /// Which update.
        token: RequestToken,
        /// Outcome.
        result: Result<Project, FetchError>,
    },
    /// Delete the shown project.
    Delete,
    /// Delete finished.
    Deleted {
        /// Which delete.
        token: RequestToken,
        /// Outcome.
        result: Result<(), FetchError>,
    },
    /// Alert timer fired or close clicked.
    DismissAlert(u64),
    /// Host navigated.
    RedirectTaken,
    /// Page going away.
    Unmount,
}

impl PageState for ProjectDetailState {
    fn redirect(&self) -> Option<Route> {
        self.redirect
    }

    fn alert(&self) -> &AlertSlot {
        &self.alert
    }
}

impl PageAction for ProjectDetailAction {
    fn redirect_taken() -> Self {
        Self::RedirectTaken
    }

    fn unmount() -> Self {
        Self::Unmount
    }
}

/// Project detail logic.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectDetailReducer;

impl ProjectDetailReducer {
    fn failed(
        state: &mut ProjectDetailState,
        error: &FetchError,
        fallback: &str,
        env: &ViewEnvironment,
    ) -> SmallVec<[Effect<ProjectDetailAction>; 4]> {
        if error.is_unauthorized() {
            state.redirect = Some(Route::Login);
        }
        smallvec![
            env.on_fetch_error(error),
            show_alert(
                &mut state.alert,
                AlertKind::Error,
                failure_message(error, fallback),
                env,
                ProjectDetailAction::DismissAlert,
            ),
        ]
    }
}

impl Reducer for ProjectDetailReducer {
    type State = ProjectDetailState;
    type Action = ProjectDetailAction;
    type Environment = ViewEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ProjectDetailAction::Load(id) => {
                let Some(token) = state.load.begin(id) else {
                    tracing::debug!(project_id = %id, "Load already in flight");
                    return smallvec![Effect::None];
                };
                if state.project_id != Some(id) {
                    // Edits to the previous project must not land on this one
                    state.mutation.abandon();
                }
                state.project_id = Some(id);
                state.project = ViewState::Loading;

                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    let result = api.get_project(id).await;
                    Some(ProjectDetailAction::Loaded { token, result })
                })]
            },
            ProjectDetailAction::Loaded { token, result } => {
                if !state.load.finish(token) {
                    return smallvec![Effect::None];
                }
                match result {
                    Ok(project) => {
                        state.project = ViewState::Loaded(project);
                        smallvec![Effect::None]
                    },
                    Err(error) => {
                        state.project = ViewState::Failed(failure_message(&error, LOAD_FAILED));
                        Self::failed(state, &error, LOAD_FAILED, env)
                    },
                }
            },
            ProjectDetailAction::Update(update) => {
                let Some(id) = state.project.loaded().map(|p| p.id) else {
                    return smallvec![Effect::None];
                };
                if update.is_empty() || state.is_mutating() {
                    return smallvec![Effect::None];
                }
                let Some(token) = state.mutation.begin(Mutation::Update) else {
                    return smallvec![Effect::None];
                };
                state.alert.clear();

                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    let result = api.update_project(id, &update).await;
                    Some(ProjectDetailAction::Updated { token, result })
                })]
            },
            ProjectDetailAction::Updated { token, result } => {
                if !state.mutation.finish(token) {
                    return smallvec![Effect::None];
                }
                match result {
                    Ok(project) => {
                        state.project = ViewState::Loaded(project);
                        smallvec![show_alert(
                            &mut state.alert,
                            AlertKind::Success,
                            PROJECT_UPDATED,
                            env,
                            ProjectDetailAction::DismissAlert,
                        )]
                    },
                    Err(error) => Self::failed(state, &error, UPDATE_FAILED, env),
                }
            },
            ProjectDetailAction::Delete => {
                let Some(id) = state.project.loaded().map(|p| p.id) else {
                    return smallvec![Effect::None];
                };
                if state.is_mutating() {
                    return smallvec![Effect::None];
                }
                let Some(token) = state.mutation.begin(Mutation::Delete) else {
                    return smallvec![Effect::None];
                };
                state.alert.clear();

                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    let result = api.delete_project(id).await;
                    Some(ProjectDetailAction::Deleted { token, result })
                })]
            },
            ProjectDetailAction::Deleted { token, result } => {
                if !state.mutation.finish(token) {
                    return smallvec![Effect::None];
                }
                match result {
                    Ok(()) => {
                        tracing::info!(project_id = ?state.project_id, "Project deleted");
                        state.project = ViewState::Idle;
                        state.redirect = Some(Route::Projects);
                        smallvec![Effect::None]
                    },
                    Err(error) => Self::failed(state, &error, DELETE_FAILED, env),
                }
            },
            ProjectDetailAction::DismissAlert(id) => {
                state.alert.dismiss(id);
                smallvec![Effect::None]
            },
            ProjectDetailAction::RedirectTaken => {
                state.redirect = None;
                smallvec![Effect::None]
            },
            ProjectDetailAction::Unmount => {
                state.load.abandon();
                state.mutation.abandon();
                smallvec![Effect::None]
            },
        }
    }
}
