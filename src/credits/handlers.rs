use axum::{extract::State, routing::get, Json, Router};
use tracing::{error, instrument};

use crate::auth::jwt::AuthUser;
use crate::auth::repo::User;
use crate::credits::dto::CreditsResponse;
use crate::credits::repo::UserCredits;
use crate::state::AppState;

pub fn credit_routes() -> Router<AppState> {
    Router::new().route("/credits", get(get_credits))
}

#[instrument(skip(state))]
pub async fn get_credits(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<CreditsResponse>, (axum::http::StatusCode, String)> {
    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "user lookup failed");
            (axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?
        .ok_or((
            axum::http::StatusCode::UNAUTHORIZED,
            "User not found".to_string(),
        ))?;

    let credits = UserCredits::get_or_create(&state.db, user.id, &user.email)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "credits lookup failed");
            (axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    Ok(Json(CreditsResponse {
        credits_remaining: credits.credits_remaining,
        has_credits: credits.credits_remaining > 0,
    }))
}
