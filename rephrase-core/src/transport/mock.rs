//! Scripted transport for tests
//!
//! Routes are matched on method and URL path. Unmatched requests get a 404
//! with an empty body. Every request is recorded, including ones that never
//! resolve.

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Method;
use tokio::sync::Notify;

use super::{HttpRequest, HttpResponse, Transport, TransportError};

/// What a route does when hit
#[derive(Clone)]
pub enum MockReply {
    /// Respond immediately
    Respond { status: u16, body: Vec<u8> },
    /// Fail at the transport level
    Fail(String),
    /// Never resolve
    Hang,
    /// Respond once the notify fires
    Gated {
        gate: Arc<Notify>,
        status: u16,
        body: Vec<u8>,
    },
}

struct Route {
    method: Method,
    path: String,
    reply: MockReply,
}

#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route; later routes for the same method and path take priority
    pub fn route(self, method: Method, path: &str, reply: MockReply) -> Self {
        self.routes.lock().unwrap().push(Route {
            method,
            path: path.to_string(),
            reply,
        });
        self
    }

    pub fn respond_json(self, method: Method, path: &str, status: u16, body: serde_json::Value) -> Self {
        self.route(
            method,
            path,
            MockReply::Respond {
                status,
                body: body.to_string().into_bytes(),
            },
        )
    }

    pub fn respond_raw(self, method: Method, path: &str, status: u16, body: &[u8]) -> Self {
        self.route(
            method,
            path,
            MockReply::Respond {
                status,
                body: body.to_vec(),
            },
        )
    }

    /// Requests seen so far, in arrival order
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests seen so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn lookup(&self, request: &HttpRequest) -> Option<MockReply> {
        self.routes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| r.method == request.method && r.path == request.url.path())
            .map(|r| r.reply.clone())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let reply = self.lookup(&request);
        self.requests.lock().unwrap().push(request);

        match reply {
            None => Ok(HttpResponse {
                status: 404,
                body: Vec::new(),
            }),
            Some(MockReply::Respond { status, body }) => Ok(HttpResponse { status, body }),
            Some(MockReply::Fail(message)) => Err(TransportError(message)),
            Some(MockReply::Hang) => std::future::pending().await,
            Some(MockReply::Gated { gate, status, body }) => {
                gate.notified().await;
                Ok(HttpResponse { status, body })
            }
        }
    }
}
