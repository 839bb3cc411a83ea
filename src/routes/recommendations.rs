use axum::{extract::State, Extension, Json};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{RecommendationRequest, RecommendationResponse},
    routes::AppState,
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        course_type = %request.course_type,
        level = %request.level,
        limit = ?request.limit,
        include_previews = request.include_previews,
        "Processing recommendation request"
    );

    let response = state.recommendations.recommend(&request).await?;

    tracing::info!(
        request_id = %request_id,
        recommendations = response.recommendations.len(),
        "Recommendation completed"
    );

    Ok(Json(response))
}
