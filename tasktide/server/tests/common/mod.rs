#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use mockall::mock;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tasktide_core::{
    Clock, InMemoryTaskRepository, RepositoryError, Task, TaskRepository, TaskService,
};
use tasktide_server::task::TaskState;
use tasktide_server::web::create_app;
use tower::ServiceExt;

mock! {
    pub Repository {}

    #[async_trait]
    impl TaskRepository for Repository {
        async fn insert(&self, task: Task) -> Result<Task, RepositoryError>;
        async fn find_by_id(&self, id: &str) -> Result<Option<Task>, RepositoryError>;
        async fn find_all(&self) -> Result<Vec<Task>, RepositoryError>;
        async fn update(&self, task: Task) -> Result<Option<Task>, RepositoryError>;
        async fn delete_by_id(&self, id: &str) -> Result<Option<Task>, RepositoryError>;
    }
}

/// A clock stopped at a known instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// 2025-03-14T09:30:00Z, a Friday morning.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()
}

/// Builds the full application over an empty in-memory store and a fixed clock.
pub fn create_test_app() -> Router {
    create_test_app_with_repository(Arc::new(InMemoryTaskRepository::new()))
}

pub fn create_test_app_with_repository(repository: Arc<dyn TaskRepository>) -> Router {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let service = TaskService::new(repository, Arc::new(FixedClock(fixed_now())));
    create_app(Arc::new(TaskState::new(service)))
}

/// Response status and body decoded as JSON.
pub struct JsonResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Sends one request through `app`. `body` is sent as JSON when given.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> JsonResponse {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    send_request(app, request).await
}

pub async fn send_request(app: &Router, request: Request<Body>) -> JsonResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    JsonResponse { status, body }
}

/// Creates a task through the API and returns its JSON representation.
pub async fn create_task(app: &Router, payload: Value) -> Value {
    let response = send(app, "POST", "/api/tasks", Some(payload)).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["data"].clone()
}

/// Snapshot of a JSON API response.
#[derive(Debug, Serialize)]
pub struct ApiResponseSnapshot {
    test_context: String,
    status: u16,
    body: Value,
}

impl ApiResponseSnapshot {
    pub fn new(response: &JsonResponse, test_context: &str) -> Self {
        Self {
            test_context: test_context.to_string(),
            status: response.status.as_u16(),
            body: response.body.clone(),
        }
    }
}
