//! Mounted page instances.
//!
//! A [`Page`] is one Store per mounted view: its own state, its own
//! outstanding requests, its own pending redirect. Unmounting abandons the
//! requests and shuts the Store down so late results go nowhere.

use crate::alert::AlertSlot;
use crate::environment::ViewEnvironment;
use crate::route::Route;
use loadforecast_core::reducer::Reducer;
use loadforecast_runtime::{EffectHandle, Store, StoreError};
use std::fmt::Debug;

/// State every page exposes to its host.
pub trait PageState {
    /// Where the page wants to go next, if anywhere.
    fn redirect(&self) -> Option<Route>;

    /// The page's alert slot.
    fn alert(&self) -> &AlertSlot;
}

/// Actions every page understands.
pub trait PageAction: Sized {
    /// The host has acted on the pending redirect.
    fn redirect_taken() -> Self;

    /// The page is going away; outstanding requests are abandoned.
    fn unmount() -> Self;
}

/// A mounted page.
pub struct Page<R>
where
    R: Reducer<Environment = ViewEnvironment>,
{
    store: Store<R::State, R::Action, ViewEnvironment, R>,
}

impl<R> Page<R>
where
    R: Reducer<Environment = ViewEnvironment> + Clone + Send + Sync + 'static,
    R::State: PageState + Send + Sync + 'static,
    R::Action: PageAction + Clone + Send + Debug + 'static,
{
    /// Mount a page with its initial state.
    #[must_use]
    pub fn new(reducer: R, state: R::State, environment: ViewEnvironment) -> Self {
        Self {
            store: Store::new(state, reducer, environment),
        }
    }

    /// Mount a page and send its first action (typically the initial load).
    ///
    /// # Errors
    ///
    /// Only if the Store refuses the action, which a fresh Store never does.
    pub async fn mount(
        reducer: R,
        state: R::State,
        environment: ViewEnvironment,
        first: R::Action,
    ) -> Result<(Self, EffectHandle), StoreError> {
        let page = Self::new(reducer, state, environment);
        let handle = page.send(first).await?;
        Ok((page, handle))
    }

    /// Send an action; the handle settles when its requests have been applied.
    ///
    /// # Errors
    ///
    /// [`StoreError::ShutdownInProgress`] after [`unmount`](Self::unmount).
    pub async fn send(&self, action: R::Action) -> Result<EffectHandle, StoreError> {
        self.store.send(action).await
    }

    /// Send an action and wait until everything it started has settled.
    ///
    /// Delayed alert dismissals count, so prefer [`send`](Self::send) when
    /// an alert is expected.
    ///
    /// # Errors
    ///
    /// [`StoreError::ShutdownInProgress`] after [`unmount`](Self::unmount).
    pub async fn dispatch(&self, action: R::Action) -> Result<(), StoreError> {
        let mut handle = self.store.send(action).await?;
        handle.wait().await;
        Ok(())
    }

    /// Read state via a closure.
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&R::State) -> T,
    {
        self.store.state(f).await
    }

    /// Consume the pending redirect.
    pub async fn take_redirect(&self) -> Option<Route> {
        let route = self.store.state(<R::State as PageState>::redirect).await?;
        if let Err(error) = self.store.send(R::Action::redirect_taken()).await {
            tracing::debug!(%error, "Redirect taken on an unmounted page");
        }
        Some(route)
    }

    /// Abandon outstanding requests and stop the page.
    pub async fn unmount(&self) {
        if let Err(error) = self.store.send(R::Action::unmount()).await {
            tracing::debug!(%error, "Page already unmounted");
        }
        self.store.shutdown();
    }

    /// Whether [`unmount`](Self::unmount) has been called.
    #[must_use]
    pub fn is_unmounted(&self) -> bool {
        self.store.is_shutting_down()
    }
}

impl<R> Clone for Page<R>
where
    R: Reducer<Environment = ViewEnvironment> + Clone,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}
