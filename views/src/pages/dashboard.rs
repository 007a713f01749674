//! Dashboard: welcome banner, project statistics and recent projects.

use super::show_alert;
use crate::alert::{AlertKind, AlertSlot};
use crate::environment::ViewEnvironment;
use crate::page::{PageAction, PageState};
use crate::request::{RequestToken, RequestTracker};
use crate::route::Route;
use crate::view_state::{ViewState, failure_message};
use loadforecast_client::{FetchError, Project, ProjectStatus};
use loadforecast_core::effect::Effect;
use loadforecast_core::reducer::Reducer;
use loadforecast_core::{SmallVec, smallvec};

/// How many projects the "recent" list shows.
pub const RECENT_PROJECTS: usize = 5;

const LOAD_FAILED: &str = "Failed to load projects. Please try again later.";

/// Counts shown in the stat cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectStats {
    /// All projects.
    pub total: usize,
    /// Created or processing.
    pub active: usize,
    /// Completed.
    pub completed: usize,
    /// Failed.
    pub failed: usize,
}

impl ProjectStats {
    /// Tally `projects`.
    #[must_use]
    pub fn from_projects(projects: &[Project]) -> Self {
        projects.iter().fold(Self::default(), |mut stats, project| {
            stats.total += 1;
            match &project.status {
                ProjectStatus::Created | ProjectStatus::Processing => stats.active += 1,
                ProjectStatus::Completed => stats.completed += 1,
                ProjectStatus::Failed => stats.failed += 1,
                ProjectStatus::Other(_) => {}
            }
            stats
        })
    }
}

/// Dashboard state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    /// Name in the welcome banner; `None` until the session has been read.
    pub username: Option<String>,
    /// The user's projects.
    pub projects: ViewState<Vec<Project>>,
    /// Outstanding project load.
    pub request: RequestTracker,
    /// Inline alert.
    pub alert: AlertSlot,
    /// Pending navigation.
    pub redirect: Option<Route>,
}

impl DashboardState {
    /// Banner text.
    #[must_use]
    pub fn welcome(&self) -> String {
        format!("Welcome, {}", self.username.as_deref().unwrap_or("User"))
    }

    /// Stat card values, once projects are loaded.
    #[must_use]
    pub fn stats(&self) -> Option<ProjectStats> {
        self.projects
            .loaded()
            .map(|projects| ProjectStats::from_projects(projects))
    }

    /// Up to [`RECENT_PROJECTS`] projects, newest first. Undated ones last.
    #[must_use]
    pub fn recent_projects(&self) -> Vec<&Project> {
        let mut recent: Vec<&Project> = self.projects.loaded().into_iter().flatten().collect();
        // `None` orders below any time, so reversing puts it at the end.
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(RECENT_PROJECTS);
        recent
    }
}

/// Dashboard input.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardAction {
    /// Page shown: read the session and load projects.
    Mount,
    /// Reload projects.
    Refresh,
    /// The session store answered.
    Welcome(Option<String>),
    /// Project load finished.
    ProjectsLoaded {
        /// Which load.
        token: RequestToken,
        /// Outcome.
        result: Result<Vec<Project>, FetchError>,
    },
    /// "New project" pressed.
    NewProject,
    /// Alert timer fired or close clicked.
    DismissAlert(u64),
    /// Host navigated.
    RedirectTaken,
    /// Page going away.
    Unmount,
}

impl PageState for DashboardState {
    fn redirect(&self) -> Option<Route> {
        self.redirect
    }

    fn alert(&self) -> &AlertSlot {
        &self.alert
    }
}

impl PageAction for DashboardAction {
    fn redirect_taken() -> Self {
        Self::RedirectTaken
    }

    fn unmount() -> Self {
        Self::Unmount
    }
}

/// Dashboard logic.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardReducer;

fn load(state: &mut DashboardState, env: &ViewEnvironment) -> Effect<DashboardAction> {
    let Some(token) = state.request.begin(()) else {
        return Effect::None;
    };
    state.projects = ViewState::Loading;

    let api = env.api.clone();
    Effect::future(async move {
        let result = api.list_projects().await;
        Some(DashboardAction::ProjectsLoaded { token, result })
    })
}

impl Reducer for DashboardReducer {
    type State = DashboardState;
    type Action = DashboardAction;
    type Environment = ViewEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            DashboardAction::Mount => {
                let session = env.session.clone();
                let welcome = Effect::future(async move {
                    let username = session.current().await.map(|s| s.username);
                    Some(DashboardAction::Welcome(username))
                });
                smallvec![welcome, load(state, env)]
            },
            DashboardAction::Refresh => smallvec![load(state, env)],
            DashboardAction::Welcome(username) => {
                state.username = username;
                smallvec![Effect::None]
            },
            DashboardAction::ProjectsLoaded { token, result } => {
                if !state.request.finish(token) {
                    return smallvec![Effect::None];
                }
                match result {
                    Ok(projects) => {
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
                                DashboardAction::DismissAlert,
                            ),
                        ]
                    },
                }
            },
            DashboardAction::NewProject => {
                state.redirect = Some(Route::NewProject);
                smallvec![Effect::None]
            },
            DashboardAction::DismissAlert(id) => {
                state.alert.dismiss(id);
                smallvec![Effect::None]
            },
            DashboardAction::RedirectTaken => {
                state.redirect = None;
                smallvec![Effect::None]
            },
            DashboardAction::Unmount => {
                state.request.abandon();
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadforecast_client::ProjectId;
    use loadforecast_core::{DateTime, Utc};

    fn project(id: i64, status: ProjectStatus, created_at: &str) -> Project {
        Project {
            id: ProjectId(id),
            name: format!("Grid {id}"),
            description: None,
            data_source: None,
            status,
            created_at: DateTime::parse_from_rfc3339(created_at)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            model_config: None,
        }
    }

    #[test]
    fn stats_count_active_as_created_plus_processing() {
        let stats = ProjectStats::from_projects(&[
            project(1, ProjectStatus::Created, "2025-01-01T00:00:00Z"),
            project(2, ProjectStatus::Processing, "2025-01-02T00:00:00Z"),
            project(3, ProjectStatus::Completed, "2025-01-03T00:00:00Z"),
            project(4, ProjectStatus::Failed, "2025-01-04T00:00:00Z"),
        ]);
        assert_eq!(
            stats,
            ProjectStats {
                total: 4,
                active: 2,
                completed: 1,
                failed: 1,
            }
        );
    }

    #[test]
    fn recent_projects_are_newest_first_and_capped() {
        let projects = (1..=7)
            .map(|id| {
                project(
                    id,
                    ProjectStatus::Created,
                    &format!("2025-01-0{id}T00:00:00Z"),
                )
            })
            .collect();
        let state = DashboardState {
            projects: ViewState::Loaded(projects),
            ..DashboardState::default()
        };

        let ids: Vec<i64> = state.recent_projects().iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn other_statuses_count_only_toward_total() {
        let stats = ProjectStats::from_projects(&[
            project(1, ProjectStatus::Created, "2025-01-01T00:00:00Z"),
            project(2, ProjectStatus::Other("Ready".to_string()), "2025-01-02T00:00:00Z"),
        ]);
        assert_eq!(
            stats,
            ProjectStats {
                total: 2,
                active: 1,
                completed: 0,
                failed: 0,
            }
        );
    }

    #[test]
    fn undated_projects_sort_after_dated_ones() {
        let state = DashboardState {
            projects: ViewState::Loaded(vec![
                project(1, ProjectStatus::Created, "not a date"),
                project(2, ProjectStatus::Created, "2025-01-02T00:00:00Z"),
            ]),
            ..DashboardState::default()
        };

        let ids: Vec<i64> = state.recent_projects().iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn welcome_falls_back_to_generic_name() {
        let mut state = DashboardState::default();
        assert_eq!(state.welcome(), "Welcome, User");
        state.username = Some("alice".to_string());
        assert_eq!(state.welcome(), "Welcome, alice");
    }
}
