//! # Load Forecasting Views
//!
//! The pages of the client as reducers. Each mounted page is its own
//! [`Page`] (one Store per view instance) holding the page's state, its
//! outstanding requests and its pending redirect. Network calls are
//! effects that come back as tagged result actions; a result whose
//! [`RequestToken`] is no longer current is dropped.
//!
//! ```ignore
//! let env = ViewEnvironment::new(session);
//! let mut app = App::start(env.clone(), Route::Dashboard).await;
//!
//! let (page, mut loaded) =
//!     Page::mount(ProjectsReducer, ProjectsState::default(), env, ProjectsAction::Load).await?;
//! loaded.wait().await;
//! page.state(|s| s.projects.clone()).await;
//!
//! app.follow(page.take_redirect().await).await;
//! ```

pub mod alert;
pub mod app;
pub mod environment;
pub mod page;
pub mod pages;
pub mod request;
pub mod route;
pub mod view_state;

pub use alert::{Alert, AlertKind, AlertSlot};
pub use app::{App, guard};
pub use environment::ViewEnvironment;
pub use page::{Page, PageAction, PageState};
pub use pages::create_project::{CreateProjectAction, CreateProjectReducer, CreateProjectState};
pub use pages::dashboard::{DashboardAction, DashboardReducer, DashboardState, ProjectStats};
pub use pages::login::{LoginAction, LoginReducer, LoginState};
pub use pages::project_detail::{ProjectDetailAction, ProjectDetailReducer, ProjectDetailState};
pub use pages::projects::{ProjectsAction, ProjectsReducer, ProjectsState};
pub use pages::register::{RegisterAction, RegisterReducer, RegisterState};
pub use request::{RequestToken, RequestTracker};
pub use route::{Route, UnknownRoute};
pub use view_state::{ViewState, failure_message};
