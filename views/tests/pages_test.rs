//! Integration tests for the pages over a scripted transport
//!
//! Each test mounts a page the way a host would (one Store per view
//! instance) and drives it through its actions.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use loadforecast_client::{HttpMethod, Password, ProjectId, ProjectStatus, ProjectUpdate};
use loadforecast_core::reducer::Reducer;
use loadforecast_session::{SessionEnvironment, SessionStore};
use loadforecast_testing::{MockTransport, fixtures, mock_api, test_clock};
use loadforecast_views::pages::create_project::NAME_REQUIRED;
use loadforecast_views::pages::login::FILL_IN_ALL_FIELDS;
use loadforecast_views::pages::project_detail::PROJECT_UPDATED;
use loadforecast_views::pages::register::PASSWORDS_DO_NOT_MATCH;
use loadforecast_views::{
    AlertKind, CreateProjectAction, CreateProjectReducer, CreateProjectState, DashboardAction,
    DashboardReducer, DashboardState, LoginAction, LoginReducer, LoginState, Page, PageAction,
    PageState, ProjectDetailAction, ProjectDetailReducer, ProjectDetailState, ProjectStats,
    ProjectsAction, ProjectsReducer, ProjectsState, RegisterAction, RegisterReducer,
    RegisterState, Route, ViewEnvironment, ViewState,
};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

const LOGIN: &str = "/api/auth/login";
const PROJECTS: &str = "/api/projects/";
const WAIT: Duration = Duration::from_secs(2);

/// Alerts stay up for the whole test unless a test says otherwise.
fn environment(transport: &Arc<MockTransport>) -> ViewEnvironment {
    let session = SessionStore::new(
        SessionEnvironment::new(mock_api(transport)).with_clock(Arc::new(test_clock())),
    );
    ViewEnvironment::new(session).with_alert_dismiss_after(Duration::from_secs(60))
}

async fn signed_in(transport: &Arc<MockTransport>) -> ViewEnvironment {
    transport.respond_with_cookie(
        HttpMethod::Post,
        LOGIN,
        200,
        fixtures::user_body(1, "alice"),
        fixtures::SESSION_COOKIE,
    );
    let env = environment(transport);
    env.session
        .login("alice", &Password::new("secret"))
        .await
        .unwrap();
    env
}

/// Poll page state until `check` holds.
async fn settle<R>(page: &Page<R>, check: impl Fn(&R::State) -> bool)
where
    R: Reducer<Environment = ViewEnvironment> + Clone + Send + Sync + 'static,
    R::State: PageState + Send + Sync + 'static,
    R::Action: PageAction + Clone + Send + Debug + 'static,
{
    for _ in 0..400 {
        if page.state(|s| check(s)).await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("page state never settled");
}

fn detail_path(id: i64) -> String {
    format!("/api/projects/{id}")
}

// ---------- Login / Register ----------

#[tokio::test]
async fn login_with_empty_field_alerts_without_network() {
    let transport = MockTransport::new();
    let page = Page::new(LoginReducer, LoginState::default(), environment(&transport));

    page.send(LoginAction::UsernameChanged("alice".into()))
        .await
        .unwrap();
    page.send(LoginAction::Submit).await.unwrap();

    let alert = page.state(|s| s.alert.current().cloned()).await.unwrap();
    assert_eq!(alert.message, FILL_IN_ALL_FIELDS);
    assert_eq!(alert.kind, AlertKind::Error);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn login_success_redirects_to_dashboard() {
    let transport = MockTransport::new();
    transport.respond_with_cookie(
        HttpMethod::Post,
        LOGIN,
        200,
        fixtures::user_body(1, "alice"),
        fixtures::SESSION_COOKIE,
    );
    let env = environment(&transport);
    let page = Page::new(LoginReducer, LoginState::default(), env.clone());

    page.dispatch(LoginAction::UsernameChanged("alice".into()))
        .await
        .unwrap();
    page.dispatch(LoginAction::PasswordChanged(Password::new("secret")))
        .await
        .unwrap();
    page.dispatch(LoginAction::Submit).await.unwrap();

    assert_eq!(page.take_redirect().await, Some(Route::Dashboard));
    assert_eq!(page.take_redirect().await, None);
    assert!(page.state(|s| s.password.is_empty()).await);
    assert!(env.session.is_authenticated().await);
}

#[tokio::test]
async fn login_rejection_shows_server_message() {
    let transport = MockTransport::new();
    transport.respond(
        HttpMethod::Post,
        LOGIN,
        401,
        fixtures::error_body("Invalid credentials"),
    );
    let env = environment(&transport);
    let page = Page::new(LoginReducer, LoginState::default(), env.clone());

    page.send(LoginAction::UsernameChanged("alice".into()))
        .await
        .unwrap();
    page.send(LoginAction::PasswordChanged(Password::new("wrong")))
        .await
        .unwrap();
    page.send(LoginAction::Submit).await.unwrap();
    assert!(page.state(LoginState::is_submitting).await);

    settle(&page, |s| !s.is_submitting()).await;
    assert_eq!(
        page.state(|s| s.alert.message().map(str::to_owned)).await.as_deref(),
        Some("Invalid credentials")
    );
    assert_eq!(page.take_redirect().await, None);
    assert!(!env.session.is_authenticated().await);
}

#[tokio::test]
async fn register_with_mismatched_confirmation_never_reaches_network() {
    let transport = MockTransport::new();
    let page = Page::new(
        RegisterReducer,
        RegisterState::default(),
        environment(&transport),
    );

    for action in [
        RegisterAction::UsernameChanged("bob".into()),
        RegisterAction::EmailChanged("bob@example.com".into()),
        RegisterAction::PasswordChanged(Password::new("secret1")),
        RegisterAction::ConfirmPasswordChanged(Password::new("secret2")),
        RegisterAction::Submit,
    ] {
        page.send(action).await.unwrap();
    }

    assert_eq!(
        page.state(|s| s.alert.message().map(str::to_owned)).await.as_deref(),
        Some(PASSWORDS_DO_NOT_MATCH)
    );
    assert!(!page.state(RegisterState::is_submitting).await);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn register_success_signs_in() {
    let transport = MockTransport::new();
    transport.respond_with_cookie(
        HttpMethod::Post,
        "/api/auth/register",
        201,
        fixtures::user_body(2, "bob"),
        fixtures::SESSION_COOKIE,
    );
    let env = environment(&transport);
    let page = Page::new(RegisterReducer, RegisterState::default(), env.clone());

    for action in [
        RegisterAction::UsernameChanged("bob".into()),
        RegisterAction::EmailChanged("bob@example.com".into()),
        RegisterAction::PasswordChanged(Password::new("secret")),
        RegisterAction::ConfirmPasswordChanged(Password::new("secret")),
    ] {
        page.send(action).await.unwrap();
    }
    page.dispatch(RegisterAction::Submit).await.unwrap();

    assert_eq!(page.take_redirect().await, Some(Route::Dashboard));
    assert_eq!(
        env.session.current().await.map(|s| s.username).as_deref(),
        Some("bob")
    );
}

#[tokio::test]
async fn alert_dismisses_itself() {
    let transport = MockTransport::new();
    let env = environment(&transport).with_alert_dismiss_after(Duration::from_millis(20));
    let page = Page::new(LoginReducer, LoginState::default(), env);

    let mut handle = page.send(LoginAction::Submit).await.unwrap();
    assert!(page.state(|s| s.alert.current().is_some()).await);

    handle.wait_with_timeout(WAIT).await.unwrap();
    assert!(page.state(|s| s.alert.current().is_none()).await);
}

// ---------- Dashboard / Projects ----------

#[tokio::test]
async fn dashboard_welcomes_user_and_counts_projects() {
    let transport = MockTransport::new();
    let env = signed_in(&transport).await;
    transport.respond(
        HttpMethod::Get,
        PROJECTS,
        200,
        fixtures::projects_body(vec![
            fixtures::project_created_at(1, "Old", "completed", "2025-01-01T00:00:00"),
            fixtures::project_created_at(2, "Running", "processing", "2025-01-03T00:00:00"),
            fixtures::project_created_at(3, "New", "created", "2025-01-04T00:00:00"),
            fixtures::project_created_at(4, "Broken", "failed", "2025-01-02T00:00:00"),
        ]),
    );

    let (page, mut handle) = Page::mount(
        DashboardReducer,
        DashboardState::default(),
        env,
        DashboardAction::Mount,
    )
    .await
    .unwrap();
    handle.wait_with_timeout(WAIT).await.unwrap();

    assert_eq!(page.state(DashboardState::welcome).await, "Welcome, alice");
    assert_eq!(
        page.state(DashboardState::stats).await,
        Some(ProjectStats {
            total: 4,
            active: 2,
            completed: 1,
            failed: 1,
        })
    );
    let recent: Vec<i64> = page
        .state(|s| s.recent_projects().iter().map(|p| p.id.0).collect())
        .await;
    assert_eq!(recent, vec![3, 2, 4, 1]);
}

#[tokio::test]
async fn dashboard_loads_projects_with_pipeline_statuses() {
    let transport = MockTransport::new();
    let env = signed_in(&transport).await;
    transport.respond(
        HttpMethod::Get,
        PROJECTS,
        200,
        fixtures::projects_body(vec![
            fixtures::project(1, "New", "created"),
            fixtures::project(2, "Uploaded", "Ready"),
        ]),
    );

    let (page, mut handle) = Page::mount(
        DashboardReducer,
        DashboardState::default(),
        env,
        DashboardAction::Mount,
    )
    .await
    .unwrap();
    handle.wait_with_timeout(WAIT).await.unwrap();

    assert_eq!(
        page.state(DashboardState::stats).await,
        Some(ProjectStats {
            total: 2,
            active: 1,
            completed: 0,
            failed: 0,
        })
    );
    assert!(page.state(|s| s.alert.current().is_none()).await);
}

#[tokio::test]
async fn empty_project_list_is_not_an_error() {
    let transport = MockTransport::new();
    let env = signed_in(&transport).await;
    transport.respond(HttpMethod::Get, PROJECTS, 200, fixtures::projects_body(vec![]));

    let (page, mut handle) = Page::mount(
        ProjectsReducer,
        ProjectsState::default(),
        env,
        ProjectsAction::Load,
    )
    .await
    .unwrap();
    handle.wait_with_timeout(WAIT).await.unwrap();

    assert!(page.state(ProjectsState::is_empty).await);
    assert!(page.state(|s| s.alert.current().is_none()).await);
}

#[tokio::test]
async fn project_list_failure_uses_page_wording() {
    let transport = MockTransport::new();
    let env = signed_in(&transport).await;
    transport.respond(HttpMethod::Get, PROJECTS, 500, fixtures::error_body("boom"));

    let (page, _handle) = Page::mount(
        ProjectsReducer,
        ProjectsState::default(),
        env,
        ProjectsAction::Load,
    )
    .await
    .unwrap();

    settle(&page, |s| s.projects.error().is_some()).await;
    assert_eq!(
        page.state(|s| s.projects.error().map(str::to_owned)).await.as_deref(),
        Some("Failed to load projects. Please try again later.")
    );
}

#[tokio::test]
async fn unauthorized_expires_session_and_redirects_to_login() {
    let transport = MockTransport::new();
    let env = signed_in(&transport).await;
    transport.respond(
        HttpMethod::Get,
        PROJECTS,
        401,
        fixtures::error_body("Authentication required"),
    );

    let (page, _handle) = Page::mount(
        ProjectsReducer,
        ProjectsState::default(),
        env.clone(),
        ProjectsAction::Load,
    )
    .await
    .unwrap();

    settle(&page, |s| s.redirect == Some(Route::Login)).await;
    for _ in 0..400 {
        if !env.session.is_authenticated().await {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(!env.session.is_authenticated().await);
    assert_eq!(page.take_redirect().await, Some(Route::Login));
}

// ---------- Project detail ----------

#[tokio::test]
async fn only_latest_project_load_updates_the_view() {
    let transport = MockTransport::new();
    let env = signed_in(&transport).await;
    let first = transport.respond_gated(
        HttpMethod::Get,
        &detail_path(1),
        200,
        fixtures::project_body(fixtures::project(1, "Grid A", "created")),
    );
    let second = transport.respond_gated(
        HttpMethod::Get,
        &detail_path(2),
        200,
        fixtures::project_body(fixtures::project(2, "Grid B", "completed")),
    );
    let page = Page::new(ProjectDetailReducer, ProjectDetailState::default(), env);

    let mut first_load = page
        .send(ProjectDetailAction::Load(ProjectId(1)))
        .await
        .unwrap();
    let mut second_load = page
        .send(ProjectDetailAction::Load(ProjectId(2)))
        .await
        .unwrap();
    // Login plus both loads
    assert!(transport.wait_for_requests(3, WAIT).await);

    second.release();
    second_load.wait_with_timeout(WAIT).await.unwrap();
    first.release();
    first_load.wait_with_timeout(WAIT).await.unwrap();

    let shown = page
        .state(|s| s.project.loaded().map(|p| (p.id, p.name.clone())))
        .await;
    assert_eq!(shown, Some((ProjectId(2), "Grid B".to_string())));
    assert_eq!(page.state(|s| s.project_id).await, Some(ProjectId(2)));
}

#[tokio::test]
async fn duplicate_load_of_same_project_is_suppressed() {
    let transport = MockTransport::new();
    let env = signed_in(&transport).await;
    let gate = transport.respond_gated(
        HttpMethod::Get,
        &detail_path(1),
        200,
        fixtures::project_body(fixtures::project(1, "Grid A", "created")),
    );
    let page = Page::new(ProjectDetailReducer, ProjectDetailState::default(), env);

    let mut load = page
        .send(ProjectDetailAction::Load(ProjectId(1)))
        .await
        .unwrap();
    let mut duplicate = page
        .send(ProjectDetailAction::Load(ProjectId(1)))
        .await
        .unwrap();
    assert!(duplicate.is_complete());
    duplicate.wait().await;

    gate.release();
    load.wait_with_timeout(WAIT).await.unwrap();

    assert_eq!(transport.requests_to(HttpMethod::Get, &detail_path(1)), 1);
    assert!(page.state(|s| s.project.loaded().is_some()).await);
}

#[tokio::test]
async fn unmounted_page_ignores_late_results() {
    let transport = MockTransport::new();
    let env = signed_in(&transport).await;
    let gate = transport.respond_gated(
        HttpMethod::Get,
        &detail_path(1),
        200,
        fixtures::project_body(fixtures::project(1, "Grid A", "created")),
    );
    let page = Page::new(ProjectDetailReducer, ProjectDetailState::default(), env);

    let mut load = page
        .send(ProjectDetailAction::Load(ProjectId(1)))
        .await
        .unwrap();
    assert!(transport.wait_for_requests(2, WAIT).await);

    page.unmount().await;
    assert!(page.is_unmounted());
    gate.release();
    load.wait_with_timeout(WAIT).await.unwrap();

    assert!(page.state(|s| s.project.is_loading()).await);
    assert!(page.send(ProjectDetailAction::Delete).await.is_err());
}

#[tokio::test]
async fn unknown_project_shows_not_found() {
    let transport = MockTransport::new();
    let env = signed_in(&transport).await;
    transport.respond(
        HttpMethod::Get,
        &detail_path(99),
        404,
        fixtures::error_body("Project not found"),
    );

    let (page, _handle) = Page::mount(
        ProjectDetailReducer,
        ProjectDetailState::default(),
        env,
        ProjectDetailAction::Load(ProjectId(99)),
    )
    .await
    .unwrap();

    settle(&page, |s| s.project.error().is_some()).await;
    assert_eq!(
        page.state(|s| s.project.error().map(str::to_owned)).await.as_deref(),
        Some("Project not found.")
    );
    assert_eq!(page.take_redirect().await, None);
}

#[tokio::test]
async fn update_replaces_project_and_confirms() {
    let transport = MockTransport::new();
    let env = signed_in(&transport).await;
    transport
        .respond(
            HttpMethod::Get,
            &detail_path(1),
            200,
            fixtures::project_body(fixtures::project(1, "Grid A", "created")),
        )
        .respond(
            HttpMethod::Put,
            &detail_path(1),
            200,
            fixtures::project_body(fixtures::project(1, "Grid A2", "created")),
        );

    let (page, mut handle) = Page::mount(
        ProjectDetailReducer,
        ProjectDetailState::default(),
        env,
        ProjectDetailAction::Load(ProjectId(1)),
    )
    .await
    .unwrap();
    handle.wait_with_timeout(WAIT).await.unwrap();

    let update = ProjectUpdate {
        name: Some("Grid A2".to_string()),
        ..ProjectUpdate::default()
    };
    page.send(ProjectDetailAction::Update(update)).await.unwrap();
    settle(&page, |s| !s.is_mutating()).await;

    let name = page
        .state(|s| s.project.loaded().map(|p| p.name.clone()))
        .await;
    assert_eq!(name.as_deref(), Some("Grid A2"));
    let alert = page.state(|s| s.alert.current().cloned()).await.unwrap();
    assert_eq!(alert.kind, AlertKind::Success);
    assert_eq!(alert.message, PROJECT_UPDATED);
}

#[tokio::test]
async fn delete_returns_to_project_list() {
    let transport = MockTransport::new();
    let env = signed_in(&transport).await;
    transport
        .respond(
            HttpMethod::Get,
            &detail_path(1),
            200,
            fixtures::project_body(fixtures::project(1, "Grid A", "created")),
        )
        .respond(
            HttpMethod::Delete,
            &detail_path(1),
            200,
            fixtures::message_body("Project deleted successfully"),
        );

    let (page, mut handle) = Page::mount(
        ProjectDetailReducer,
        ProjectDetailState::default(),
        env,
        ProjectDetailAction::Load(ProjectId(1)),
    )
    .await
    .unwrap();
    handle.wait_with_timeout(WAIT).await.unwrap();

    page.dispatch(ProjectDetailAction::Delete).await.unwrap();

    assert_eq!(page.take_redirect().await, Some(Route::Projects));
    assert_eq!(page.state(|s| s.project.clone()).await, ViewState::Idle);
}

// ---------- Create project ----------

#[tokio::test]
async fn create_without_name_alerts_without_network() {
    let transport = MockTransport::new();
    let page = Page::new(
        CreateProjectReducer,
        CreateProjectState::default(),
        environment(&transport),
    );

    page.send(CreateProjectAction::DescriptionChanged("Feeder loads".into()))
        .await
        .unwrap();
    page.send(CreateProjectAction::Submit).await.unwrap();

    assert_eq!(
        page.state(|s| s.alert.message().map(str::to_owned)).await.as_deref(),
        Some(NAME_REQUIRED)
    );
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn create_redirects_to_new_project() {
    let transport = MockTransport::new();
    let env = signed_in(&transport).await;
    transport.respond(
        HttpMethod::Post,
        PROJECTS,
        201,
        fixtures::project_body(fixtures::project(7, "Grid A", "created")),
    );
    let page = Page::new(CreateProjectReducer, CreateProjectState::default(), env);

    page.send(CreateProjectAction::NameChanged("Grid A".into()))
        .await
        .unwrap();
    page.dispatch(CreateProjectAction::Submit).await.unwrap();

    assert_eq!(
        page.take_redirect().await,
        Some(Route::ProjectDetail(ProjectId(7)))
    );
    let body = transport.requests().last().unwrap().body.clone().unwrap();
    assert_eq!(body["name"], "Grid A");
}

#[tokio::test]
async fn create_rejection_shows_server_message() {
    let transport = MockTransport::new();
    let env = signed_in(&transport).await;
    transport.respond(
        HttpMethod::Post,
        PROJECTS,
        400,
        fixtures::error_body("Project name already exists"),
    );
    let page = Page::new(CreateProjectReducer, CreateProjectState::default(), env);

    page.send(CreateProjectAction::NameChanged("Grid A".into()))
        .await
        .unwrap();
    page.send(CreateProjectAction::Submit).await.unwrap();

    settle(&page, |s| !s.is_submitting()).await;
    assert_eq!(
        page.state(|s| s.alert.message().map(str::to_owned)).await.as_deref(),
        Some("Project name already exists")
    );
    assert_eq!(page.take_redirect().await, None);
}

#[tokio::test]
async fn created_project_status_is_created() {
    let transport = MockTransport::new();
    let env = signed_in(&transport).await;
    transport
        .respond(
            HttpMethod::Post,
            PROJECTS,
            201,
            fixtures::project_body(fixtures::project(3, "Grid A", "created")),
        )
        .respond(
            HttpMethod::Get,
            &detail_path(3),
            200,
            fixtures::project_body(fixtures::project(3, "Grid A", "created")),
        );
    let page = Page::new(CreateProjectReducer, CreateProjectState::default(), env.clone());

    page.send(CreateProjectAction::NameChanged("Grid A".into()))
        .await
        .unwrap();
    page.dispatch(CreateProjectAction::Submit).await.unwrap();
    let Some(Route::ProjectDetail(id)) = page.take_redirect().await else {
        panic!("expected a redirect to the new project");
    };
    page.unmount().await;

    let (detail, mut handle) = Page::mount(
        ProjectDetailReducer,
        ProjectDetailState::default(),
        env,
        ProjectDetailAction::Load(id),
    )
    .await
    .unwrap();
    handle.wait_with_timeout(WAIT).await.unwrap();

    assert_eq!(
        detail.state(|s| s.project.loaded().map(|p| p.status.clone())).await,
        Some(ProjectStatus::Created)
    );
}
