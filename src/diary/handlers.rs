use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::auth::jwt::AuthUser;
use crate::diary::dto::{CreateEntryRequest, DayQuery, DayResponse, UpdateServingsRequest};
use crate::diary::repo::FoodEntry;
use crate::diary::services::{clamp_servings, compute_totals};
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/diary/entries", get(list_entries))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/diary/entries", post(create_entry))
        .route("/diary/entries/:id", patch(update_entry).delete(delete_entry))
}

#[instrument(skip(state, payload))]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<FoodEntry>), (StatusCode, String)> {
    let food_name = payload.food_name.trim();
    if food_name.is_empty() {
        warn!(%user_id, "empty food name");
        return Err((StatusCode::BAD_REQUEST, "food_name is required".into()));
    }

    let servings = clamp_servings(payload.servings);
    let entry = FoodEntry::insert(
        &state.db,
        user_id,
        payload.date,
        food_name,
        payload.calories,
        payload.protein,
        payload.carbs,
        payload.fat,
        servings,
    )
    .await
    .map_err(|e| {
        error!(error = %e, %user_id, "insert food entry failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    info!(%user_id, entry_id = %entry.id, food = %entry.food_name, "food entry added");
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<DayQuery>,
) -> Result<Json<DayResponse>, (StatusCode, String)> {
    let entries = FoodEntry::list_for_date(&state.db, user_id, params.date)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "list food entries failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    let totals = compute_totals(&entries);
    Ok(Json(DayResponse {
        date: params.date,
        entries,
        totals,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateServingsRequest>,
) -> Result<Json<FoodEntry>, (StatusCode, String)> {
    let servings = clamp_servings(payload.servings);

    let entry = FoodEntry::update_servings(&state.db, user_id, id, servings)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, %id, "update servings failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?
        .ok_or((StatusCode::NOT_FOUND, "Entry not found".to_string()))?;

    info!(%user_id, entry_id = %entry.id, servings = %entry.servings, "servings adjusted");
    Ok(Json(entry))
}

#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let deleted = FoodEntry::delete(&state.db, user_id, id).await.map_err(|e| {
        error!(error = %e, %user_id, %id, "delete food entry failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    if !deleted {
        return Err((StatusCode::NOT_FOUND, "Entry not found".into()));
    }

    info!(%user_id, entry_id = %id, "food entry removed");
    Ok(StatusCode::NO_CONTENT)
}
