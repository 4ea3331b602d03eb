use axum::Router;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json};
use std::sync::Arc;
use tasktide_core::{InMemoryTaskRepository, SystemClock, TaskService};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::task::TaskState;
use error::ErrorResponse;

pub mod api;
pub mod error;

/// Builds the complete application router: JSON API, health check, API docs and fallback.
pub fn create_app(state: Arc<TaskState>) -> Router {
    Router::new()
        .merge(api::create_api_router(state))
        .route("/health", axum::routing::get(health_check_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::ApiDoc::openapi()))
        .fallback(not_found_handler)
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = config.server_address();
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let service = TaskService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(SystemClock),
    );
    let state = Arc::new(TaskState::new(service));

    let app = create_app(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config)?),
    );

    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    match &config.cors_allow_origin {
        Some(origin) => {
            tracing::info!("Allowing cross-origin requests from {}", origin);
            Ok(CorsLayer::new()
                .allow_origin(HeaderValue::from_str(origin)?)
                .allow_methods(Any)
                .allow_headers(Any))
        }
        None => Ok(CorsLayer::permissive()),
    }
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

/// Answers every request that matched no route.
#[tracing::instrument]
pub async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Route not found")),
    )
}
