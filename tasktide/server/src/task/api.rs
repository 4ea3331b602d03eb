use crate::task::{TaskState, format_timestamp};
use crate::web::error::{ApiError, ErrorResponse};
use axum::{
    Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::{get, patch},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tasktide_core::{NewTask, Task, TaskChanges, TaskFilter};
use utoipa::{IntoParams, ToSchema};

/// JSON representation of a Task for API responses.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskJson {
    /// Unique identifier for the task
    id: String,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// One of work, personal, health, learning
    #[schema(example = "work")]
    category: String,
    /// One of high, medium, low
    #[schema(example = "high")]
    priority: String,
    #[schema(format = DateTime)]
    due_date: Option<String>,
    /// Estimated effort in hours
    estimate: f64,
    completed: bool,
    /// When the task was last marked completed
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(format = DateTime)]
    completed_at: Option<String>,
    #[schema(format = DateTime)]
    created_at: String,
    #[schema(format = DateTime)]
    updated_at: String,
    /// Urgency score between 0 and 100
    ai_score: u8,
}

impl From<Task> for TaskJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id().to_string(),
            title: task.title().to_string(),
            description: task.description().map(str::to_string),
            category: task.category().to_string(),
            priority: task.priority().to_string(),
            due_date: task.due_date().map(format_timestamp),
            estimate: task.estimate(),
            completed: task.is_completed(),
            completed_at: task.completed_at().map(format_timestamp),
            created_at: format_timestamp(task.created_at()),
            updated_at: format_timestamp(task.updated_at()),
            ai_score: task.ai_score(),
        }
    }
}

/// API response for listing tasks.
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskListResponse {
    success: bool,
    data: Vec<TaskJson>,
    /// Number of tasks returned
    count: usize,
}

/// API response carrying a single task.
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskResponse {
    success: bool,
    data: TaskJson,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl TaskResponse {
    fn new(task: Task, message: Option<String>) -> Self {
        Self {
            success: true,
            data: TaskJson::from(task),
            message,
        }
    }
}

/// Request body for creating a task, as documented in the OpenAPI schema.
///
/// Bodies are validated from raw JSON so every violation can be reported.
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Between 1 and 200 characters
    pub title: String,
    /// At most 1000 characters
    pub description: Option<String>,
    #[schema(example = "work")]
    pub category: String,
    #[schema(example = "medium")]
    pub priority: String,
    /// ISO 8601 date or date-time
    pub due_date: Option<String>,
    /// Hours between 0.5 and 24, defaults to 1
    pub estimate: Option<f64>,
    pub completed: Option<bool>,
}

/// Request body for updating a task. Every field is optional.
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    /// `null` clears the due date
    pub due_date: Option<String>,
    pub estimate: Option<f64>,
    pub completed: Option<bool>,
}

/// Query parameters for filtering tasks.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TasksQuery {
    /// Category to keep, or `all`
    category: Option<String>,
    /// Priority to keep, or `all`
    priority: Option<String>,
    /// `true` for completed tasks only, anything else for incomplete only
    completed: Option<String>,
}

/// Handler for GET /api/tasks - Returns tasks matching the filters in listing order.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/tasks",
    params(TasksQuery),
    responses(
        (status = 200, description = "Successfully retrieved tasks", body = TaskListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn list_tasks_handler(
    State(state): State<Arc<TaskState>>,
    Query(query): Query<TasksQuery>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let filter = TaskFilter::from_query(
        query.category.as_deref(),
        query.priority.as_deref(),
        query.completed.as_deref(),
    );
    let tasks = state
        .service
        .list_tasks(&filter)
        .await
        .map_err(ApiError::from_task_error("Failed to fetch tasks"))?;

    let data: Vec<TaskJson> = tasks.into_iter().map(TaskJson::from).collect();
    let count = data.len();
    Ok(Json(TaskListResponse {
        success: true,
        data,
        count,
    }))
}

/// Handler for GET /api/tasks/{id}.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task found", body = TaskResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn get_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state
        .service
        .get_task(&id)
        .await
        .map_err(ApiError::from_task_error("Failed to fetch task"))?;
    Ok(Json(TaskResponse::new(task, None)))
}

/// Handler for POST /api/tasks.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn create_task_handler(
    State(state): State<Arc<TaskState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let Json(payload) = payload?;
    let new_task = NewTask::from_json(&payload)?;
    let task = state
        .service
        .create_task(new_task)
        .await
        .map_err(ApiError::from_task_error("Failed to create task"))?;

    Ok((
        StatusCode::CREATED,
        Json(TaskResponse::new(
            task,
            Some("Task created successfully".to_string()),
        )),
    ))
}

/// Handler for PUT /api/tasks/{id} - Applies a partial update.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task ID")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn update_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TaskResponse>, ApiError> {
    let map_error = || ApiError::from_task_error("Failed to update task");

    // An unknown id is reported before any problem with the body.
    state.service.get_task(&id).await.map_err(map_error())?;
    let Json(payload) = payload?;
    let changes = TaskChanges::from_json(&payload)?;

    let task = state
        .service
        .update_task(&id, changes)
        .await
        .map_err(map_error())?;
    Ok(Json(TaskResponse::new(
        task,
        Some("Task updated successfully".to_string()),
    )))
}

/// Handler for DELETE /api/tasks/{id}.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task deleted", body = TaskResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn delete_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state
        .service
        .delete_task(&id)
        .await
        .map_err(ApiError::from_task_error("Failed to delete task"))?;
    Ok(Json(TaskResponse::new(
        task,
        Some("Task deleted successfully".to_string()),
    )))
}

/// Handler for PATCH /api/tasks/{id}/toggle - Flips the completion flag.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    patch,
    path = "/api/tasks/{id}/toggle",
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task toggled", body = TaskResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn toggle_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state
        .service
        .toggle_task(&id)
        .await
        .map_err(ApiError::from_task_error("Failed to toggle task"))?;

    let status = if task.is_completed() {
        "completed"
    } else {
        "incomplete"
    };
    Ok(Json(TaskResponse::new(
        task,
        Some(format!("Task marked as {status}")),
    )))
}

/// Creates and returns the tasks API router.
pub fn create_api_router(state: Arc<TaskState>) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks_handler).post(create_task_handler))
        .route(
            "/tasks/{id}",
            get(get_task_handler)
                .put(update_task_handler)
                .delete(delete_task_handler),
        )
        .route("/tasks/{id}/toggle", patch(toggle_task_handler))
        .with_state(state)
}
