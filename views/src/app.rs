//! App shell: startup restore, route guard and the nav bar's logout.

use crate::environment::ViewEnvironment;
use crate::route::{Route, UnknownRoute};

/// Where a navigation actually lands.
///
/// Protected routes send anonymous users to Login; the auth pages send
/// signed-in users to the Dashboard.
#[must_use]
pub const fn guard(requested: Route, authenticated: bool) -> Route {
    match (requested.is_protected(), authenticated) {
        (true, false) => Route::Login,
        (false, true) => Route::Dashboard,
        _ => requested,
    }
}

/// The running application.
#[derive(Debug)]
pub struct App {
    environment: ViewEnvironment,
    route: Route,
}

impl App {
    /// Restore the session, then land on `initial` (after guarding it).
    pub async fn start(environment: ViewEnvironment, initial: Route) -> Self {
        let restored = environment.session.restore_session().await;
        tracing::info!(
            authenticated = restored.is_some(),
            route = %initial,
            "App started"
        );
        let route = guard(initial, restored.is_some());
        Self { environment, route }
    }

    /// The page currently shown.
    #[must_use]
    pub const fn route(&self) -> Route {
        self.route
    }

    /// Dependencies to mount pages with.
    #[must_use]
    pub const fn environment(&self) -> &ViewEnvironment {
        &self.environment
    }

    /// Go to `requested`, subject to the guard. Returns where we landed.
    pub async fn navigate(&mut self, requested: Route) -> Route {
        let authenticated = self.environment.session.is_authenticated().await;
        self.route = guard(requested, authenticated);
        if self.route != requested {
            tracing::debug!(%requested, landed = %self.route, "Navigation redirected");
        }
        self.route
    }

    /// Go to a URL path.
    ///
    /// # Errors
    ///
    /// [`UnknownRoute`] if no page lives at `path`.
    pub async fn navigate_path(&mut self, path: &str) -> Result<Route, UnknownRoute> {
        let requested = path.parse()?;
        Ok(self.navigate(requested).await)
    }

    /// Follow a page's pending redirect, if it has one.
    pub async fn follow(&mut self, redirect: Option<Route>) -> Route {
        match redirect {
            Some(route) => self.navigate(route).await,
            None => self.route,
        }
    }

    /// Nav bar logout. Always lands on Login.
    pub async fn logout(&mut self) -> Route {
        if let Err(error) = self.environment.session.logout().await {
            tracing::warn!(%error, "Server logout failed; signed out locally");
        }
        self.route = Route::Login;
        self.route
    }
}
