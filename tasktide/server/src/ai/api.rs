use crate::task::{TaskState, format_timestamp};
use crate::web::error::{ApiError, ErrorResponse};
use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tasktide_core::{Analytics, Breakdown, Suggestion};
use utoipa::ToSchema;

/// JSON representation of a Suggestion for API responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct SuggestionJson {
    /// One of warning, info, suggestion, motivation
    #[serde(rename = "type")]
    #[schema(example = "warning")]
    kind: String,
    message: String,
    /// Label for the call to action
    action: String,
    /// One of high, medium, low
    priority: String,
}

impl From<Suggestion> for SuggestionJson {
    fn from(suggestion: Suggestion) -> Self {
        Self {
            kind: suggestion.kind.as_str().to_string(),
            message: suggestion.message,
            action: suggestion.action,
            priority: suggestion.priority.to_string(),
        }
    }
}

/// API response for listing suggestions.
#[derive(Debug, Serialize, ToSchema)]
pub struct SuggestionsResponse {
    success: bool,
    data: Vec<SuggestionJson>,
    count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverviewJson {
    total_tasks: usize,
    completed_tasks: usize,
    /// Percentage of tasks completed, 0 when there are none
    productivity_score: u8,
    /// Estimated hours of completed work
    time_blocked: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BreakdownJson {
    total: usize,
    completed: usize,
}

impl From<Breakdown> for BreakdownJson {
    fn from(breakdown: Breakdown) -> Self {
        Self {
            total: breakdown.total,
            completed: breakdown.completed,
        }
    }
}

/// JSON representation of the analytics report.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsJson {
    overview: OverviewJson,
    /// Counts per category present in the collection
    category_stats: BTreeMap<String, BreakdownJson>,
    /// Counts per priority present in the collection
    priority_stats: BTreeMap<String, BreakdownJson>,
    #[schema(format = DateTime)]
    generated_at: String,
}

impl From<Analytics> for AnalyticsJson {
    fn from(analytics: Analytics) -> Self {
        Self {
            overview: OverviewJson {
                total_tasks: analytics.overview.total_tasks,
                completed_tasks: analytics.overview.completed_tasks,
                productivity_score: analytics.overview.productivity_score,
                time_blocked: analytics.overview.time_blocked,
            },
            category_stats: analytics
                .category_stats
                .into_iter()
                .map(|(category, breakdown)| (category.to_string(), breakdown.into()))
                .collect(),
            priority_stats: analytics
                .priority_stats
                .into_iter()
                .map(|(priority, breakdown)| (priority.to_string(), breakdown.into()))
                .collect(),
            generated_at: format_timestamp(analytics.generated_at),
        }
    }
}

/// API response carrying the analytics report.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyticsResponse {
    success: bool,
    data: AnalyticsJson,
}

/// Request body for POST /api/ai/prioritize.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PrioritizeRequest {
    /// Tasks to score. Any JSON objects are accepted and returned unchanged apart from `aiScore`.
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    tasks: Value,
}

/// API response for prioritised tasks.
#[derive(Debug, Serialize, ToSchema)]
pub struct PrioritizeResponse {
    success: bool,
    /// The submitted tasks, most urgent first
    #[schema(value_type = Vec<Object>)]
    data: Vec<Value>,
    message: String,
}

/// Handler for GET /api/ai/suggestions.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/ai/suggestions",
    responses(
        (status = 200, description = "Suggestions for the current task collection", body = SuggestionsResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "AI"
)]
pub async fn suggestions_handler(
    State(state): State<Arc<TaskState>>,
) -> Result<Json<SuggestionsResponse>, ApiError> {
    let suggestions = state
        .service
        .suggestions()
        .await
        .map_err(ApiError::from_task_error("Failed to generate AI suggestions"))?;

    let data: Vec<SuggestionJson> = suggestions.into_iter().map(SuggestionJson::from).collect();
    let count = data.len();
    Ok(Json(SuggestionsResponse {
        success: true,
        data,
        count,
    }))
}

/// Handler for GET /api/ai/analytics.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/ai/analytics",
    responses(
        (status = 200, description = "Productivity analytics", body = AnalyticsResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "AI"
)]
pub async fn analytics_handler(
    State(state): State<Arc<TaskState>>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let analytics = state
        .service
        .analytics()
        .await
        .map_err(ApiError::from_task_error("Failed to generate analytics"))?;

    Ok(Json(AnalyticsResponse {
        success: true,
        data: analytics.into(),
    }))
}

/// Handler for POST /api/ai/prioritize - Scores the submitted tasks with category weighting.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/api/ai/prioritize",
    request_body = PrioritizeRequest,
    responses(
        (status = 200, description = "Tasks sorted by score", body = PrioritizeResponse),
        (status = 400, description = "Tasks is not an array", body = ErrorResponse)
    ),
    tag = "AI"
)]
pub async fn prioritize_handler(
    State(state): State<Arc<TaskState>>,
    payload: Result<Json<PrioritizeRequest>, JsonRejection>,
) -> Result<Json<PrioritizeResponse>, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::BadRequest("Tasks must be an array"))?;
    let Value::Array(tasks) = request.tasks else {
        return Err(ApiError::BadRequest("Tasks must be an array"));
    };

    Ok(Json(PrioritizeResponse {
        success: true,
        data: state.service.prioritize(tasks),
        message: "Tasks prioritized successfully".to_string(),
    }))
}

/// Creates and returns the AI API router.
pub fn create_api_router(state: Arc<TaskState>) -> Router {
    Router::new()
        .route("/ai/suggestions", get(suggestions_handler))
        .route("/ai/analytics", get(analytics_handler))
        .route("/ai/prioritize", post(prioritize_handler))
        .with_state(state)
}
