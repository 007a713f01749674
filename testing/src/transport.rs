//! Scripted [`HttpTransport`] for tests.
//!
//! Responses are queued per method and path and consumed in order. Every
//! request is recorded, including the `Cookie` header it carried, so tests
//! can assert which calls reached "the network" and with which credential.
//! A gated response holds the request open until the test releases it,
//! which is how response ordering is controlled.

use async_trait::async_trait;
use loadforecast_client::{
    ClientConfig, ForecastApi, HttpMethod, HttpRequest, HttpResponse, HttpTransport,
    TransportError,
};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{Notify, oneshot};

type Outcome = Result<HttpResponse, TransportError>;

enum Scripted {
    Ready(Outcome),
    Gated(oneshot::Receiver<()>, Outcome),
}

/// Releases a gated response.
#[derive(Debug)]
pub struct Gate(oneshot::Sender<()>);

impl Gate {
    /// Let the held response through.
    pub fn release(self) {
        let _ = self.0.send(());
    }
}

/// A transport that answers from a script.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<Scripted>>>,
    requests: Mutex<Vec<HttpRequest>>,
    arrived: Notify,
}

impl MockTransport {
    /// Create a transport with nothing scripted.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, method: HttpMethod, path: &str, scripted: Scripted) {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((method, path.to_string()))
            .or_default()
            .push_back(scripted);
    }

    /// Queue a JSON response.
    pub fn respond(&self, method: HttpMethod, path: &str, status: u16, body: Value) -> &Self {
        self.push(method, path, Scripted::Ready(Ok(response(status, body, None))));
        self
    }

    /// Queue a JSON response that also sets a cookie.
    pub fn respond_with_cookie(
        &self,
        method: HttpMethod,
        path: &str,
        status: u16,
        body: Value,
        set_cookie: &str,
    ) -> &Self {
        self.push(
            method,
            path,
            Scripted::Ready(Ok(response(status, body, Some(set_cookie)))),
        );
        self
    }

    /// Queue a response with a raw, possibly non-JSON, body.
    pub fn respond_raw(&self, method: HttpMethod, path: &str, status: u16, body: &str) -> &Self {
        self.push(
            method,
            path,
            Scripted::Ready(Ok(HttpResponse {
                status,
                set_cookies: Vec::new(),
                body: body.to_string(),
            })),
        );
        self
    }

    /// Queue a transport failure.
    pub fn fail(&self, method: HttpMethod, path: &str, error: TransportError) -> &Self {
        self.push(method, path, Scripted::Ready(Err(error)));
        self
    }

    /// Queue a JSON response that is held until the returned [`Gate`] is released.
    #[must_use]
    pub fn respond_gated(&self, method: HttpMethod, path: &str, status: u16, body: Value) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.push(method, path, Scripted::Gated(rx, Ok(response(status, body, None))));
        Gate(tx)
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of requests received for one method and path.
    #[must_use]
    pub fn requests_to(&self, method: HttpMethod, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Wait until at least `count` requests have arrived.
    ///
    /// Returns `false` if they did not arrive within `timeout`.
    pub async fn wait_for_requests(&self, count: usize, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, async {
            loop {
                let notified = self.arrived.notified();
                if self.request_count() >= count {
                    return;
                }
                notified.await;
            }
        })
        .await
        .is_ok()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let key = (request.method, request.path.clone());
        let description = format!("{} {}", request.method, request.path);

        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        self.arrived.notify_waiters();

        let scripted = self
            .routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&key)
            .and_then(VecDeque::pop_front);

        match scripted {
            Some(Scripted::Ready(outcome)) => outcome,
            Some(Scripted::Gated(gate, outcome)) => {
                // A dropped gate never releases: the request stays pending
                if gate.await.is_err() {
                    std::future::pending::<()>().await;
                }
                outcome
            },
            None => Err(TransportError::Network(format!(
                "no response scripted for {description}"
            ))),
        }
    }
}

fn response(status: u16, body: Value, set_cookie: Option<&str>) -> HttpResponse {
    HttpResponse {
        status,
        set_cookies: set_cookie.map(str::to_string).into_iter().collect(),
        body: if body.is_null() {
            String::new()
        } else {
            body.to_string()
        },
    }
}

/// An API client over `transport` with default timeouts.
#[must_use]
pub fn mock_api(transport: &Arc<MockTransport>) -> ForecastApi {
    mock_api_with(transport, &ClientConfig::default())
}

/// An API client over `transport` with the given timeouts.
#[must_use]
pub fn mock_api_with(transport: &Arc<MockTransport>, config: &ClientConfig) -> ForecastApi {
    let transport: Arc<dyn HttpTransport> = Arc::clone(transport) as Arc<dyn HttpTransport>;
    ForecastApi::with_transport(transport, config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use serde_json::json;

    fn get(path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: path.to_string(),
            body: None,
            cookie: None,
        }
    }

    #[tokio::test]
    async fn responses_are_consumed_in_order() {
        let transport = MockTransport::new();
        transport
            .respond(HttpMethod::Get, "/a", 200, json!({"n": 1}))
            .respond(HttpMethod::Get, "/a", 404, json!({"error": "gone"}));

        assert_eq!(transport.execute(get("/a")).await.unwrap().status, 200);
        assert_eq!(transport.execute(get("/a")).await.unwrap().status, 404);
        assert!(matches!(
            transport.execute(get("/a")).await,
            Err(TransportError::Network(_))
        ));
        assert_eq!(transport.requests_to(HttpMethod::Get, "/a"), 3);
    }

    #[tokio::test]
    async fn gated_response_waits_for_release() {
        let transport = MockTransport::new();
        let gate = transport.respond_gated(HttpMethod::Get, "/slow", 200, json!({}));

        let pending = {
            let transport = Arc::clone(&transport);
            tokio::spawn(async move { transport.execute(get("/slow")).await })
        };

        assert!(transport.wait_for_requests(1, Duration::from_secs(1)).await);
        assert!(!pending.is_finished());

        gate.release();
        assert_eq!(pending.await.unwrap().unwrap().status, 200);
    }
}
