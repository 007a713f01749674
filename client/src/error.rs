//! Error taxonomy for resource fetchers and auth calls.
//!
//! [`HttpError`] says what happened on the wire. [`FetchError`] and
//! [`AuthError`] say what it means to the application, and each can render
//! a message fit for the user: mapped text, never a raw status code. Server
//! messages are passed through only where the server is talking to the user
//! (validation and credential rejections).

use crate::http::HttpError;
use serde_json::Value;
use thiserror::Error;

/// Result type alias for resource fetchers.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Extract the server's `{"error": "..."}` (or `message`) text.
#[must_use]
pub fn server_message(body: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

/// Failure of a project resource fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No response reached the client.
    #[error("network failure")]
    NetworkFailure,

    /// No response within the timeout.
    #[error("request timed out")]
    Timeout,

    /// 401: the session is missing or no longer valid.
    #[error("not authenticated")]
    Unauthorized,

    /// 403: the project belongs to someone else.
    #[error("access denied")]
    Forbidden,

    /// 404.
    #[error("not found")]
    NotFound,

    /// 400/409/422 with the server's explanation.
    #[error("rejected by server: {0}")]
    Validation(String),

    /// Any other status.
    #[error("unexpected status {0}")]
    Unknown(u16),

    /// The response did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    /// Message to show in an inline alert.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NetworkFailure => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            },
            Self::Timeout => "The server took too long to respond. Please try again.".to_string(),
            Self::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            Self::Forbidden => "You do not have access to this project.".to_string(),
            Self::NotFound => "Project not found.".to_string(),
            Self::Validation(message) => message.clone(),
            Self::Unknown(_) => "Something went wrong. Please try again.".to_string(),
            Self::MalformedResponse(_) => "The server sent an unexpected response.".to_string(),
        }
    }

    /// Whether the caller must drop the session and send the user to login.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl From<HttpError> for FetchError {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::NetworkFailure(_) => Self::NetworkFailure,
            HttpError::Timeout => Self::Timeout,
            HttpError::MalformedBody(detail) => Self::MalformedResponse(detail),
            HttpError::HttpStatus { status, body } => match status {
                400 | 409 | 422 => Self::Validation(
                    server_message(&body)
                        .unwrap_or_else(|| "The request was rejected.".to_string()),
                ),
                401 => Self::Unauthorized,
                403 => Self::Forbidden,
                404 => Self::NotFound,
                other => Self::Unknown(other),
            },
        }
    }
}

/// Failure of a login, registration or logout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// 401 on login: the server's message, e.g. "Invalid credentials".
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// 400/409/422: missing field, username taken...
    #[error("rejected by server: {0}")]
    Validation(String),

    /// No response reached the client.
    #[error("network failure")]
    NetworkFailure,

    /// No response within the timeout.
    #[error("request timed out")]
    Timeout,

    /// Any other status.
    #[error("unexpected status {0}")]
    Unknown(u16),

    /// The response did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A login or registration is already outstanding.
    #[error("another sign-in request is in progress")]
    RequestInFlight,

    /// The request was abandoned by a logout before it completed.
    #[error("sign-in cancelled")]
    Cancelled,
}

impl AuthError {
    /// Message to show in an inline alert.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCredentials(message) | Self::Validation(message) => message.clone(),
            Self::NetworkFailure => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            },
            Self::Timeout => "The server took too long to respond. Please try again.".to_string(),
            Self::Unknown(_) => "An unexpected error occurred. Please try again.".to_string(),
            Self::MalformedResponse(_) => "The server sent an unexpected response.".to_string(),
            Self::RequestInFlight => "Please wait for the current request to finish.".to_string(),
            Self::Cancelled => "Sign-in was cancelled.".to_string(),
        }
    }
}

impl From<HttpError> for AuthError {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::NetworkFailure(_) => Self::NetworkFailure,
            HttpError::Timeout => Self::Timeout,
            HttpError::MalformedBody(detail) => Self::MalformedResponse(detail),
            HttpError::HttpStatus { status, body } => match status {
                401 => Self::InvalidCredentials(
                    server_message(&body).unwrap_or_else(|| "Invalid credentials".to_string()),
                ),
                400 | 409 | 422 => Self::Validation(
                    server_message(&body)
                        .unwrap_or_else(|| "The request was rejected.".to_string()),
                ),
                other => Self::Unknown(other),
            },
        }
    }
}

impl From<FetchError> for AuthError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::NetworkFailure => Self::NetworkFailure,
            FetchError::Timeout => Self::Timeout,
            FetchError::Unauthorized => Self::InvalidCredentials("Invalid credentials".to_string()),
            FetchError::Validation(message) => Self::Validation(message),
            FetchError::MalformedResponse(detail) => Self::MalformedResponse(detail),
            FetchError::Forbidden => Self::Unknown(403),
            FetchError::NotFound => Self::Unknown(404),
            FetchError::Unknown(status) => Self::Unknown(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn status(status: u16, body: Value) -> HttpError {
        HttpError::HttpStatus { status, body }
    }

    #[test]
    fn not_found_maps_to_not_found() {
        let error = FetchError::from(status(404, json!({"error": "Project not found"})));
        assert_eq!(error, FetchError::NotFound);
    }

    #[test]
    fn validation_passes_server_message_verbatim() {
        let error = FetchError::from(status(400, json!({"error": "Project name is required"})));
        assert_eq!(error, FetchError::Validation("Project name is required".to_string()));
        assert_eq!(error.user_message(), "Project name is required");
    }

    #[test]
    fn validation_without_message_gets_a_default() {
        let error = FetchError::from(status(400, Value::String("<html>".to_string())));
        assert_eq!(error, FetchError::Validation("The request was rejected.".to_string()));
    }

    #[test]
    fn unauthorized_and_forbidden_are_distinct() {
        assert!(FetchError::from(status(401, Value::Null)).is_unauthorized());
        assert_eq!(FetchError::from(status(403, Value::Null)), FetchError::Forbidden);
    }

    #[test]
    fn transport_failures_map_directly() {
        assert_eq!(
            FetchError::from(HttpError::NetworkFailure("refused".to_string())),
            FetchError::NetworkFailure
        );
        assert_eq!(FetchError::from(HttpError::Timeout), FetchError::Timeout);
        assert!(matches!(
            FetchError::from(HttpError::MalformedBody("eof".to_string())),
            FetchError::MalformedResponse(_)
        ));
    }

    #[test]
    fn login_rejection_carries_server_message() {
        let error = AuthError::from(status(401, json!({"error": "Invalid credentials"})));
        assert_eq!(error, AuthError::InvalidCredentials("Invalid credentials".to_string()));
        assert_eq!(error.user_message(), "Invalid credentials");
    }

    #[test]
    fn duplicate_username_is_a_validation_error() {
        let error = AuthError::from(status(409, json!({"error": "Username already exists"})));
        assert_eq!(error.user_message(), "Username already exists");
    }

    #[test]
    fn server_message_prefers_error_key_and_skips_blank() {
        assert_eq!(
            server_message(&json!({"error": "a", "message": "b"})),
            Some("a".to_string())
        );
        assert_eq!(server_message(&json!({"message": "b"})), Some("b".to_string()));
        assert_eq!(server_message(&json!({"error": "  "})), None);
        assert_eq!(server_message(&Value::Null), None);
    }

    proptest! {
        #[test]
        fn unmapped_statuses_become_unknown_without_leaking_codes(code in 405u16..600) {
            prop_assume!(code != 409 && code != 422);
            let error = FetchError::from(status(code, json!({"error": "boom"})));
            prop_assert_eq!(&error, &FetchError::Unknown(code));
            prop_assert!(!error.user_message().contains(&code.to_string()));

            let auth = AuthError::from(status(code, json!({"error": "boom"})));
            prop_assert!(!auth.user_message().contains(&code.to_string()));
        }
    }
}
