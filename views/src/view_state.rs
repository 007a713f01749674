//! Per-page load state.

use loadforecast_client::FetchError;

/// What a page shows for one resource.
///
/// Replaced wholesale on every fetch completion, never merged.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState<T> {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is outstanding.
    Loading,
    /// The last request succeeded.
    Loaded(T),
    /// The last request failed; the message is ready to show.
    Failed(String),
}

impl<T> ViewState<T> {
    /// Whether a request is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The loaded value, if any.
    #[must_use]
    pub const fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// The failure message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Message for a failed fetch.
///
/// Validation messages and well-understood failures use the error's own
/// text; anything unexpected falls back to the page's wording.
#[must_use]
pub fn failure_message(error: &FetchError, fallback: &str) -> String {
    match error {
        FetchError::Unknown(_) | FetchError::MalformedResponse(_) => fallback.to_string(),
        other => other.user_message(),
    }
}
