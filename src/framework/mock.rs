//! # Mock Gateway
//!
//! Test doubles for [`Gateway`] so controllers and stores can be exercised
//! without a server.
//!
//! Two styles are available:
//!
//! - [`MockGateway`]: queue expectations up front (`expect_get("/skills").return_ok(...)`),
//!   run the code under test, then call [`MockGateway::verify`].
//! - [`create_mock_gateway`]: get a [`ChannelGateway`] plus the receiving end, and answer
//!   each [`GatewayCall`] by hand. Useful when a test needs a request to stay in flight.
//!
//! ```ignore
//! let mut mock = MockGateway::new();
//! mock.expect_post("/skills").return_ok(json!({ "_id": "1", "skill": "Rust" }));
//! mock.expect_get("/skills").return_ok(json!([{ "_id": "1", "skill": "Rust" }]));
//!
//! let (store, controller) = portfolio_admin::resources::skill::new(mock.gateway());
//! controller.stage(SkillDraft { name: "Rust".into() });
//! controller.submit().await?;
//! mock.verify();
//! ```

use crate::framework::error::GatewayError;
use crate::framework::gateway::{ApiRequest, Gateway, Method};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

/// Response slot for one in-flight request.
pub type Responder = oneshot::Sender<Result<Value, GatewayError>>;

/// A request captured by a [`ChannelGateway`].
#[derive(Debug)]
pub struct GatewayCall {
    pub request: ApiRequest,
    pub respond_to: Responder,
}

/// Gateway that forwards every request over a channel and waits for the answer.
#[derive(Clone)]
pub struct ChannelGateway {
    sender: mpsc::Sender<GatewayCall>,
}

impl ChannelGateway {
    pub fn new(sender: mpsc::Sender<GatewayCall>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl Gateway for ChannelGateway {
    async fn send(&self, request: ApiRequest) -> Result<Value, GatewayError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(GatewayCall { request, respond_to })
            .await
            .map_err(|_| GatewayError::Transport("gateway closed".into()))?;
        response
            .await
            .map_err(|_| GatewayError::Transport("gateway dropped response channel".into()))?
    }
}

struct Expectation {
    method: Method,
    path: String,
    response: Result<Value, GatewayError>,
}

/// A gateway with expectation tracking for fluent testing.
///
/// Each request takes the oldest queued expectation with the same method and
/// path, so expectations for one endpoint are answered in order while
/// concurrent requests to different endpoints may arrive in any order. A
/// request with no matching expectation is answered with a transport error and
/// remembered, so [`verify`](MockGateway::verify) fails.
pub struct MockGateway {
    gateway: ChannelGateway,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    unexpected: Arc<Mutex<Vec<ApiRequest>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl MockGateway {
    /// Creates a new mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<GatewayCall>(100);
        let expectations = Arc::new(Mutex::new(VecDeque::<Expectation>::new()));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let unexpected = Arc::new(Mutex::new(Vec::new()));

        let exps = expectations.clone();
        let log = requests.clone();
        let misses = unexpected.clone();
        let handle = tokio::spawn(async move {
            while let Some(GatewayCall { request, respond_to }) = receiver.recv().await {
                log.lock().unwrap().push(request.clone());

                let mut queue = exps.lock().unwrap();
                let expectation = queue
                    .iter()
                    .position(|e| e.method == request.method && e.path == request.path)
                    .and_then(|index| queue.remove(index));
                drop(queue);

                match expectation {
                    Some(expectation) => {
                        let _ = respond_to.send(expectation.response);
                    }
                    None => {
                        let detail = format!("unexpected {} {}", request.method, request.path);
                        misses.lock().unwrap().push(request);
                        let _ = respond_to.send(Err(GatewayError::Transport(detail)));
                    }
                }
            }
        });

        Self {
            gateway: ChannelGateway::new(sender),
            expectations,
            requests,
            unexpected,
            _handle: handle,
        }
    }

    /// The gateway handle to inject into stores and controllers.
    pub fn gateway(&self) -> Arc<dyn Gateway> {
        Arc::new(self.gateway.clone())
    }

    pub fn expect(&mut self, method: Method, path: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            path: path.into(),
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_get(&mut self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Get, path)
    }

    pub fn expect_post(&mut self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Post, path)
    }

    pub fn expect_put(&mut self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Put, path)
    }

    pub fn expect_delete(&mut self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Delete, path)
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// How many requests with this method and path were received.
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Verifies that all expectations were met and nothing unexpected arrived.
    pub fn verify(&self) {
        let unexpected = self.unexpected.lock().unwrap();
        if !unexpected.is_empty() {
            panic!("Unexpected requests: {:?}", *unexpected);
        }
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            let pending: Vec<_> = exps.iter().map(|e| format!("{} {}", e.method, e.path)).collect();
            panic!("Not all expectations were met. Remaining: {:?}", pending);
        }
    }
}

/// Builder for a single expectation.
pub struct ExpectationBuilder {
    method: Method,
    path: String,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl ExpectationBuilder {
    /// Answers with a decoded JSON body.
    pub fn return_ok(self, body: Value) {
        self.push(Ok(body));
    }

    /// Answers with any serializable body.
    pub fn return_json<S: Serialize>(self, body: &S) {
        let value = serde_json::to_value(body).unwrap();
        self.push(Ok(value));
    }

    /// Answers with a non-2xx status and an optional server message.
    pub fn return_status(self, status: u16, message: Option<&str>) {
        self.push(Err(GatewayError::HttpStatus {
            status,
            message: message.map(str::to_owned),
        }));
    }

    pub fn return_err(self, error: GatewayError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Value, GatewayError>) {
        self.expectations.lock().unwrap().push_back(Expectation {
            method: self.method,
            path: self.path,
            response,
        });
    }
}

// =============================================================================
// CHANNEL HELPERS
// =============================================================================

/// Creates a channel-backed gateway and the receiver its requests arrive on.
///
/// Each [`GatewayCall`] stays pending until the test answers `respond_to`,
/// which makes it possible to observe state while a request is in flight.
pub fn create_mock_gateway(buffer_size: usize) -> (ChannelGateway, mpsc::Receiver<GatewayCall>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ChannelGateway::new(sender), receiver)
}

/// Waits for the next request and checks its method and path.
pub async fn expect_call(
    receiver: &mut mpsc::Receiver<GatewayCall>,
    method: Method,
    path: &str,
) -> Option<GatewayCall> {
    match receiver.recv().await {
        Some(call) if call.request.method == method && call.request.path == path => Some(call),
        _ => None,
    }
}
