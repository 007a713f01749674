//! New project form.

use super::show_alert;
use crate::alert::{AlertKind, AlertSlot};
use crate::environment::ViewEnvironment;
use crate::page::{PageAction, PageState};
use crate::request::{RequestToken, RequestTracker};
use crate::route::Route;
use crate::view_state::failure_message;
use loadforecast_client::{FetchError, NewProject, Project};
use loadforecast_core::effect::Effect;
use loadforecast_core::reducer::Reducer;
use loadforecast_core::{SmallVec, smallvec};

/// Shown when the name field is blank.
pub const NAME_REQUIRED: &str = "Project name is required";

const CREATE_FAILED: &str = "Failed to create project";

/// New project form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateProjectState {
    /// Name field.
    pub name: String,
    /// Description field.
    pub description: String,
    /// Data source field.
    pub data_source: String,
    /// Outstanding submission.
    pub request: RequestTracker,
    /// Inline alert.
    pub alert: AlertSlot,
    /// Pending navigation.
    pub redirect: Option<Route>,
}

impl CreateProjectState {
    /// Whether the submit button is disabled.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.request.is_outstanding()
    }

    /// The form as a create request. Blank optional fields are left out.
    #[must_use]
    pub fn to_new_project(&self) -> NewProject {
        let mut project = NewProject::named(self.name.trim());
        if !self.description.trim().is_empty() {
            project = project.with_description(self.description.trim());
        }
        if !self.data_source.trim().is_empty() {
            project = project.with_data_source(self.data_source.trim());
        }
        project
    }
}

/// New project form input.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateProjectAction {
    /// Name typed.
    NameChanged(String),
    /// Description typed.
    DescriptionChanged(String),
    /// Data source typed.
    DataSourceChanged(String),
    /// Submit pressed.
    Submit,
    /// Creation finished.
    Created {
        /// Which submission.
        token: RequestToken,
        /// Outcome.
        result: Result<Project, FetchError>,
    },
    /// Cancel pressed.
    Cancel,
    /// Alert timer fired or close clicked.
    DismissAlert(u64),
    /// Host navigated.
    RedirectTaken,
    /// Page going away.
    Unmount,
}

impl PageState for CreateProjectState {
    fn redirect(&self) -> Option<Route> {
        self.redirect
    }

    fn alert(&self) -> &AlertSlot {
        &self.alert
    }
}

impl PageAction for CreateProjectAction {
    fn redirect_taken() -> Self {
        Self::RedirectTaken
    }

    fn unmount() -> Self {
        Self::Unmount
    }
}

/// New project form logic.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateProjectReducer;

impl Reducer for CreateProjectReducer {
    type State = CreateProjectState;
    type Action = CreateProjectAction;
    type Environment = ViewEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CreateProjectAction::NameChanged(name) => {
                state.name = name;
                smallvec![Effect::None]
            },
            CreateProjectAction::DescriptionChanged(description) => {
                state.description = description;
                smallvec![Effect::None]
            },
            CreateProjectAction::DataSourceChanged(data_source) => {
                state.data_source = data_source;
                smallvec![Effect::None]
            },
            CreateProjectAction::Submit => {
                if state.is_submitting() {
                    return smallvec![Effect::None];
                }
                if state.name.trim().is_empty() {
                    return smallvec![show_alert(
                        &mut state.alert,
                        AlertKind::Error,
                        NAME_REQUIRED,
                        env,
                        CreateProjectAction::DismissAlert,
                    )];
                }
                let Some(token) = state.request.begin(()) else {
                    return smallvec![Effect::None];
                };
                state.alert.clear();

                let api = env.api.clone();
                let project = state.to_new_project();
                smallvec![Effect::future(async move {
                    let result = api.create_project(&project).await;
                    Some(CreateProjectAction::Created { token, result })
                })]
            },
            CreateProjectAction::Created { token, result } => {
                if !state.request.finish(token) {
                    return smallvec![Effect::None];
                }
                match result {
                    Ok(project) => {
                        tracing::info!(project_id = %project.id, "Project created");
                        state.redirect = Some(Route::ProjectDetail(project.id));
                        smallvec![Effect::None]
                    },
                    Err(error) => {
                        if error.is_unauthorized() {
                            state.redirect = Some(Route::Login);
                        }
                        smallvec![
                            env.on_fetch_error(&error),
                            show_alert(
                                &mut state.alert,
                                AlertKind::Error,
                                failure_message(&error, CREATE_FAILED),
                                env,
                                CreateProjectAction::DismissAlert,
                            ),
                        ]
                    },
                }
            },
            CreateProjectAction::Cancel => {
                state.request.abandon();
                state.redirect = Some(Route::Projects);
                smallvec![Effect::None]
            },
            CreateProjectAction::DismissAlert(id) => {
                state.alert.dismiss(id);
                smallvec![Effect::None]
            },
            CreateProjectAction::RedirectTaken => {
                state.redirect = None;
                smallvec![Effect::None]
            },
            CreateProjectAction::Unmount => {
                state.request.abandon();
                smallvec![Effect::None]
            },
        }
    }
}
