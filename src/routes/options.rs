use axum::{extract::State, Json};

use crate::{models::OptionsResponse, routes::AppState};

/// Course types and levels the model was trained on, in code order
pub async fn list_options(State(state): State<AppState>) -> Json<OptionsResponse> {
    let model = state.recommendations.model();
    Json(OptionsResponse {
        types: model.types().to_vec(),
        levels: model.levels().to_vec(),
    })
}
