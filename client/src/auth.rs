//! Authentication endpoints.

use crate::api::ForecastApi;
use crate::error::{AuthError, FetchError};
use crate::http::HttpMethod;
use crate::model::{Password, User};
use crate::wire::{self, LoginBody, RegisterBody, UserEnvelope};
use serde_json::Value;

fn user_from(value: Value) -> Result<User, wire::MappingError> {
    wire::decode::<UserEnvelope>(value).map(|envelope| User::from(envelope.user))
}

fn to_json<T: serde::Serialize>(body: &T) -> Result<Value, AuthError> {
    serde_json::to_value(body).map_err(|e| AuthError::MalformedResponse(e.to_string()))
}

impl ForecastApi {
    /// `POST /api/auth/login`.
    ///
    /// The session cookie in the response is captured by the credential jar.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] with the server message on 401,
    /// otherwise see [`AuthError`].
    pub async fn login(&self, username: &str, password: &Password) -> Result<User, AuthError> {
        let body = to_json(&LoginBody {
            username,
            password: password.expose(),
        })?;
        let value = self
            .http
            .request(HttpMethod::Post, "/api/auth/login", Some(body))
            .await?;
        let user = user_from(value).map_err(|e| AuthError::MalformedResponse(e.0))?;
        tracing::debug!(user_id = %user.id, "Logged in");
        Ok(user)
    }

    /// `POST /api/auth/register`. The server signs the new account in.
    ///
    /// # Errors
    ///
    /// [`AuthError::Validation`] for missing fields or a taken
    /// username/email, otherwise see [`AuthError`].
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &Password,
    ) -> Result<User, AuthError> {
        let body = to_json(&RegisterBody {
            username,
            email,
            password: password.expose(),
        })?;
        let value = self
            .http
            .request(HttpMethod::Post, "/api/auth/register", Some(body))
            .await?;
        let user = user_from(value).map_err(|e| AuthError::MalformedResponse(e.0))?;
        tracing::debug!(user_id = %user.id, "Registered");
        Ok(user)
    }

    /// `POST /api/auth/logout`, bounded by the logout timeout.
    ///
    /// The credential jar is emptied before the request goes out.
    ///
    /// # Errors
    ///
    /// Reports the server or network failure, after the credential is gone.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let credential = self.detach_credential();
        self.logout_with(credential).await
    }

    /// Empty the credential jar, returning the `Cookie` header it held.
    ///
    /// Pair with [`logout_with`](Self::logout_with) to sign the old
    /// credential out on the server while new sign-ins use a clean jar.
    #[must_use]
    pub fn detach_credential(&self) -> Option<String> {
        self.http.credentials().take_header()
    }

    /// `POST /api/auth/logout` for a credential already removed from the
    /// jar. The jar is neither read nor updated.
    ///
    /// # Errors
    ///
    /// Reports the server or network failure.
    pub async fn logout_with(&self, credential: Option<String>) -> Result<(), AuthError> {
        let result = self
            .http
            .request_detached(
                HttpMethod::Post,
                "/api/auth/logout",
                None,
                credential,
                self.logout_timeout,
            )
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(error) => {
                tracing::warn!(%error, "Logout request failed; credential dropped anyway");
                Err(error.into())
            },
        }
    }

    /// `GET /api/auth/profile`: the account behind the stored credential.
    ///
    /// # Errors
    ///
    /// [`FetchError::Unauthorized`] when no valid credential is stored.
    pub async fn profile(&self) -> Result<User, FetchError> {
        let value = self
            .http
            .request(HttpMethod::Get, "/api/auth/profile", None)
            .await?;
        user_from(value).map_err(|e| FetchError::MalformedResponse(e.0))
    }
}
