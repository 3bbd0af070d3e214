//! In-process test fixture: the full router over an in-memory store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use ren_core::{
    testing::MockExecutor, CommandExecutor, Config, InMemoryTicketStore, SafetyExecutor,
    SafetyLimits, TelemetrySink, TicketOrchestrator, TicketStore,
};
use ren_server::state::AppState;

/// Router plus handles on the shared state for assertions.
pub struct TestFixture {
    pub router: Router,
    pub state: Arc<AppState>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Fixture backed by the real safety executor with default limits.
    pub fn new() -> Self {
        Self::with_executor(Arc::new(SafetyExecutor::default()))
    }

    /// Fixture backed by a controllable mock executor.
    pub fn with_mock(mock: Arc<MockExecutor>) -> Self {
        Self::with_executor(mock)
    }

    fn with_executor(executor: Arc<dyn CommandExecutor>) -> Self {
        let config = Config::default();
        let telemetry = Arc::new(TelemetrySink::new(config.telemetry.retention).with_logging(false));
        let store: Arc<dyn TicketStore> = Arc::new(InMemoryTicketStore::new());
        let orchestrator = Arc::new(TicketOrchestrator::new(store, executor, telemetry));
        let limits = SafetyLimits::from(&config.executor);

        let state = Arc::new(AppState::new(config, orchestrator, limits, None));
        let router = ren_server::api::create_router(Arc::clone(&state));

        Self { router, state }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        let body = serde_json::to_string(&body).unwrap();
        self.request("POST", path, Some((body.as_str(), "application/json")))
            .await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        self.request("POST", path, Some((body, "application/json")))
            .await
    }

    /// Send a POST request with custom content type.
    pub async fn post_with_content_type(
        &self,
        path: &str,
        body: &str,
        content_type: &str,
    ) -> TestResponse {
        self.request("POST", path, Some((body, content_type))).await
    }

    /// Create a drive ticket and return its id.
    pub async fn create_drive(&self, speed: f64, duration: u64) -> String {
        let response = self
            .post(
                "/ticket",
                serde_json::json!({
                    "command": "drive",
                    "params": {"speed": speed, "duration_seconds": duration},
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
        response.body["id"].as_str().unwrap().to_string()
    }

    /// Create a parameterless ticket for `command` and return its id.
    pub async fn create_ticket_with_command(&self, command: &str) -> String {
        let response = self
            .post("/ticket", serde_json::json!({ "command": command }))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
        response.body["id"].as_str().unwrap().to_string()
    }

    async fn request(&self, method: &str, path: &str, body: Option<(&str, &str)>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);

        let body = match body {
            Some((content, content_type)) => {
                builder = builder.header("Content-Type", content_type);
                Body::from(content.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&bytes).into_owned();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body, text }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}
