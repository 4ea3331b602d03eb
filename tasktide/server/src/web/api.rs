use std::sync::Arc;

use axum::Router;
use utoipa::OpenApi;

use crate::task::TaskState;
use crate::web::error::ErrorResponse;
use crate::{ai, task};

/// Creates the API routes for JSON API endpoints.
pub fn create_api_router(state: Arc<TaskState>) -> Router {
    let task_routes = task::api::create_api_router(state.clone());
    let ai_routes = ai::api::create_api_router(state);
    Router::new().nest("/api", task_routes.merge(ai_routes))
}

#[derive(OpenApi)]
#[openapi(
    info(title = "TaskTide API", description = "Task management with heuristic prioritisation"),
    paths(
        task::api::list_tasks_handler,
        task::api::get_task_handler,
        task::api::create_task_handler,
        task::api::update_task_handler,
        task::api::delete_task_handler,
        task::api::toggle_task_handler,
        ai::api::suggestions_handler,
        ai::api::analytics_handler,
        ai::api::prioritize_handler,
    ),
    components(schemas(ErrorResponse)),
    tags(
        (name = "Tasks", description = "Task CRUD"),
        (name = "AI", description = "Suggestions, analytics and prioritisation")
    )
)]
pub struct ApiDoc;
