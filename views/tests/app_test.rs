//! Integration tests for the app shell: startup restore, route guard, logout

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use loadforecast_client::{HttpMethod, Password, ProjectId, TransportError};
use loadforecast_session::{SessionEnvironment, SessionStore};
use loadforecast_testing::{MockTransport, fixtures, mock_api, test_clock};
use loadforecast_views::{App, Route, UnknownRoute, ViewEnvironment};
use std::sync::Arc;

const PROFILE: &str = "/api/auth/profile";

fn environment(transport: &Arc<MockTransport>) -> ViewEnvironment {
    let session = SessionStore::new(
        SessionEnvironment::new(mock_api(transport)).with_clock(Arc::new(test_clock())),
    );
    ViewEnvironment::new(session)
}

#[tokio::test]
async fn anonymous_start_lands_on_login() {
    let transport = MockTransport::new();
    transport.respond(
        HttpMethod::Get,
        PROFILE,
        401,
        fixtures::error_body("Authentication required"),
    );

    let app = App::start(environment(&transport), Route::Projects).await;

    assert_eq!(app.route(), Route::Login);
    assert_eq!(transport.requests_to(HttpMethod::Get, PROFILE), 1);
}

#[tokio::test]
async fn restored_session_skips_login_page() {
    let transport = MockTransport::new();
    transport.respond(HttpMethod::Get, PROFILE, 200, fixtures::user_body(1, "alice"));

    let mut app = App::start(environment(&transport), Route::Login).await;

    assert_eq!(app.route(), Route::Dashboard);
    assert_eq!(app.navigate(Route::Register).await, Route::Dashboard);
    assert_eq!(
        app.navigate(Route::ProjectDetail(ProjectId(4))).await,
        Route::ProjectDetail(ProjectId(4))
    );
}

#[tokio::test]
async fn restore_failure_is_swallowed() {
    let transport = MockTransport::new();
    transport.fail(HttpMethod::Get, PROFILE, TransportError::Network("refused".into()));

    let mut app = App::start(environment(&transport), Route::Register).await;

    assert_eq!(app.route(), Route::Register);
    assert_eq!(app.navigate(Route::NewProject).await, Route::Login);
}

#[tokio::test]
async fn login_then_navigation_is_allowed() {
    let transport = MockTransport::new();
    transport
        .respond(HttpMethod::Get, PROFILE, 401, fixtures::error_body("Authentication required"))
        .respond_with_cookie(
            HttpMethod::Post,
            "/api/auth/login",
            200,
            fixtures::user_body(1, "alice"),
            fixtures::SESSION_COOKIE,
        );
    let mut app = App::start(environment(&transport), Route::Dashboard).await;
    assert_eq!(app.route(), Route::Login);

    app.environment()
        .session
        .login("alice", &Password::new("secret"))
        .await
        .unwrap();

    assert_eq!(app.follow(Some(Route::Dashboard)).await, Route::Dashboard);
    assert_eq!(app.follow(None).await, Route::Dashboard);
    assert_eq!(app.navigate_path("/projects/new").await, Ok(Route::NewProject));
    assert_eq!(
        app.navigate_path("/settings").await,
        Err(UnknownRoute("/settings".to_string()))
    );
    assert_eq!(app.route(), Route::NewProject);
}

#[tokio::test]
async fn logout_lands_on_login_even_when_server_fails() {
    let transport = MockTransport::new();
    transport
        .respond(HttpMethod::Get, PROFILE, 200, fixtures::user_body(1, "alice"))
        .respond(HttpMethod::Post, "/api/auth/logout", 500, fixtures::error_body("boom"));
    let mut app = App::start(environment(&transport), Route::Dashboard).await;
    assert_eq!(app.route(), Route::Dashboard);

    assert_eq!(app.logout().await, Route::Login);

    assert!(!app.environment().session.is_authenticated().await);
    assert_eq!(app.navigate(Route::Dashboard).await, Route::Login);
}
