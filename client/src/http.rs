//! HTTP client adapter: the single chokepoint for every network call.
//!
//! [`HttpClient`] attaches the stored credential, applies the request
//! timeout, captures credentials the server issues, and turns the outcome
//! into `Result<serde_json::Value, HttpError>`. It never retries.
//!
//! The actual I/O sits behind [`HttpTransport`] so tests can script
//! responses without a server.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;

/// HTTP methods used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

/// A request as handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Method.
    pub method: HttpMethod,
    /// Path relative to the API base, e.g. `/api/projects/`.
    pub path: String,
    /// JSON body, if any.
    pub body: Option<Value>,
    /// `Cookie` header value, present only when a credential is stored.
    pub cookie: Option<String>,
}

/// A response as returned by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Raw `Set-Cookie` header values.
    pub set_cookies: Vec<String>,
    /// Raw body text.
    pub body: String,
}

/// Failure before any response arrived.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, reset...
    #[error("network failure: {0}")]
    Network(String),
    /// The transport gave up waiting.
    #[error("request timed out")]
    Timeout,
}

/// Performs the raw exchange with the server.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send one request and return the server's response.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Outcome of a failed call through [`HttpClient`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HttpError {
    /// No response reached the client.
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The server answered with 4xx/5xx.
    #[error("server responded with status {status}")]
    HttpStatus {
        /// Status code.
        status: u16,
        /// Decoded JSON body (`Value::String` if it was not JSON).
        body: Value,
    },

    /// No response within the timeout.
    #[error("request timed out")]
    Timeout,

    /// A success response whose body is not JSON.
    #[error("malformed response body: {0}")]
    MalformedBody(String),
}

// ═══════════════════════════════════════════════════════════════════════
// Credential jar
// ═══════════════════════════════════════════════════════════════════════

fn render(cookies: &BTreeMap<String, String>) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }
    Some(
        cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; "),
    )
}

/// Session cookies issued by the server.
///
/// Shared by every clone of the [`HttpClient`]; cleared on logout.
#[derive(Debug, Clone, Default)]
pub struct CredentialJar {
    cookies: Arc<Mutex<BTreeMap<String, String>>>,
}

impl CredentialJar {
    /// Create an empty jar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `Cookie` header for the next request, `None` when the jar is empty.
    #[must_use]
    pub fn cookie_header(&self) -> Option<String> {
        render(&self.cookies.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Store or drop cookies according to `Set-Cookie` header values.
    ///
    /// A cookie with an empty value, `Max-Age=0`, or a 1970 expiry is the
    /// server telling us to forget it.
    pub fn absorb<S: AsRef<str>>(&self, set_cookies: &[S]) {
        if set_cookies.is_empty() {
            return;
        }
        let mut cookies = self.cookies.lock().unwrap_or_else(PoisonError::into_inner);
        for header in set_cookies {
            let mut parts = header.as_ref().split(';');
            let Some((name, value)) = parts.next().and_then(|pair| pair.split_once('=')) else {
                continue;
            };
            let name = name.trim();
            let value = value.trim().trim_matches('"');
            if name.is_empty() {
                continue;
            }

            let expired = value.is_empty()
                || parts.any(|attribute| {
                    let attribute = attribute.trim().to_ascii_lowercase();
                    attribute == "max-age=0"
                        || (attribute.starts_with("expires=") && attribute.contains("1970"))
                });

            if expired {
                tracing::debug!(cookie = name, "Server expired credential");
                cookies.remove(name);
            } else {
                tracing::debug!(cookie = name, "Stored credential");
                cookies.insert(name.to_string(), value.to_string());
            }
        }
    }

    /// `Cookie` header of the stored credentials, emptying the jar in the
    /// same step.
    #[must_use]
    pub fn take_header(&self) -> Option<String> {
        let mut cookies = self.cookies.lock().unwrap_or_else(PoisonError::into_inner);
        render(&std::mem::take(&mut *cookies))
    }

    /// Forget every credential.
    pub fn clear(&self) {
        self.cookies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Whether a credential is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Client
// ═══════════════════════════════════════════════════════════════════════

/// JSON-over-HTTP client with credential handling.
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn HttpTransport>,
    credentials: CredentialJar,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client over `transport` with the given per-request timeout.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, timeout: Duration) -> Self {
        Self {
            transport,
            credentials: CredentialJar::new(),
            timeout,
        }
    }

    /// The credential jar shared by all clones of this client.
    #[must_use]
    pub const fn credentials(&self) -> &CredentialJar {
        &self.credentials
    }

    /// Default per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issue a request with the default timeout.
    ///
    /// # Errors
    ///
    /// See [`HttpError`].
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, HttpError> {
        self.request_with_timeout(method, path, body, self.timeout).await
    }

    /// Issue a request with an explicit timeout.
    ///
    /// # Errors
    ///
    /// See [`HttpError`].
    #[tracing::instrument(skip_all, fields(method = %method, path = %path))]
    pub async fn request_with_timeout(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        timeout: Duration,
    ) -> Result<Value, HttpError> {
        let request = HttpRequest {
            method,
            path: path.to_string(),
            body,
            cookie: self.credentials.cookie_header(),
        };
        self.exchange(request, timeout, true).await
    }

    /// Issue a request on behalf of a credential that is no longer in the
    /// jar.
    ///
    /// `cookie` is sent as given; `Set-Cookie` headers in the response are
    /// ignored, so the jar (and whoever signed in since) is left alone.
    ///
    /// # Errors
    ///
    /// See [`HttpError`].
    #[tracing::instrument(skip_all, fields(method = %method, path = %path))]
    pub async fn request_detached(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        cookie: Option<String>,
        timeout: Duration,
    ) -> Result<Value, HttpError> {
        let request = HttpRequest {
            method,
            path: path.to_string(),
            body,
            cookie,
        };
        self.exchange(request, timeout, false).await
    }

    async fn exchange(
        &self,
        request: HttpRequest,
        timeout: Duration,
        absorb: bool,
    ) -> Result<Value, HttpError> {
        let response = match tokio::time::timeout(timeout, self.transport.execute(request)).await {
            Err(_) | Ok(Err(TransportError::Timeout)) => {
                tracing::warn!(timeout_ms = timeout.as_millis(), "Request timed out");
                return Err(HttpError::Timeout);
            },
            Ok(Err(TransportError::Network(reason))) => {
                tracing::warn!(%reason, "Request failed before a response arrived");
                return Err(HttpError::NetworkFailure(reason));
            },
            Ok(Ok(response)) => response,
        };

        if absorb {
            self.credentials.absorb(&response.set_cookies);
        }
        tracing::debug!(status = response.status, "Response received");

        if response.status >= 400 {
            let body = serde_json::from_str(&response.body)
                .unwrap_or(Value::String(response.body));
            return Err(HttpError::HttpStatus {
                status: response.status,
                body,
            });
        }

        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|e| HttpError::MalformedBody(e.to_string()))
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("timeout", &self.timeout)
            .field("has_credentials", &!self.credentials.is_empty())
            .finish_non_exhaustive()
    }
}
