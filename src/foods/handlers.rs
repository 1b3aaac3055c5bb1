use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{error, instrument, warn};

use crate::auth::jwt::AuthUser;
use crate::foods::dto::FoodSummary;
use crate::state::AppState;

pub fn food_routes() -> Router<AppState> {
    Router::new().route("/foods/search", get(search_foods))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

#[instrument(skip(state))]
pub async fn search_foods(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<FoodSummary>>, (axum::http::StatusCode, String)> {
    let query = params.query.trim();
    if query.is_empty() {
        warn!(%user_id, "empty food search query");
        return Err((
            axum::http::StatusCode::BAD_REQUEST,
            "Search query must not be empty".into(),
        ));
    }

    let foods = state.usda.search(query).await.map_err(|e| {
        error!(error = %e, %user_id, %query, "food search failed");
        (
            axum::http::StatusCode::BAD_GATEWAY,
            "Failed to fetch food data. Please try again.".into(),
        )
    })?;

    let items: Vec<FoodSummary> = foods.into_iter().map(FoodSummary::from).collect();
    Ok(Json(items))
}
