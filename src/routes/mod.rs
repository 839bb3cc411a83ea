use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::RecommendationService,
};

pub mod options;
pub mod previews;
pub mod recommendations;

/// Shared application state
///
/// Everything behind it is read-only, so handlers never take a lock.
#[derive(Clone)]
pub struct AppState {
    pub recommendations: Arc<RecommendationService>,
}

impl AppState {
    pub fn new(recommendations: RecommendationService) -> Self {
        Self {
            recommendations: Arc::new(recommendations),
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/options", get(options::list_options))
        .route("/recommendations", post(recommendations::recommend))
        .route("/previews", get(previews::preview))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
