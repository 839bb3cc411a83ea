use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::LinkPreview,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    url: String,
}

/// Handler for the link preview endpoint
///
/// Only URLs of catalog courses are previewed. Fetch failures still answer 200
/// with sentinels.
pub async fn preview(
    State(state): State<AppState>,
    Query(params): Query<PreviewQuery>,
) -> AppResult<Json<LinkPreview>> {
    let url = params.url.trim();
    if url.is_empty() {
        return Err(AppError::InvalidInput("url cannot be empty".to_string()));
    }

    let in_catalog = state
        .recommendations
        .model()
        .courses()
        .iter()
        .any(|course| course.url.trim() == url);
    if !in_catalog {
        return Err(AppError::NotFound(format!("No course with url '{}'", url)));
    }

    let preview = state.recommendations.previewer().preview(url).await;
    Ok(Json(preview))
}
