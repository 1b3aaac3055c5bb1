use axum::{extract::State, routing::post, Json, Router};
use tracing::{error, info, instrument, warn};

use crate::auth::jwt::AuthUser;
use crate::auth::repo::User;
use crate::credits::repo::UserCredits;
use crate::mealgen::dto::{GenerateRequest, GenerateResponse};
use crate::mealgen::parse::parse_generated_meal;
use crate::mealgen::prompt::build_prompt;
use crate::state::AppState;

pub fn generator_routes() -> Router<AppState> {
    Router::new().route("/meals/generate", post(generate_meal))
}

/// One credit buys one generation. The credit is spent atomically before
/// the completion call, so a zero balance can never reach the paid API.
#[instrument(skip(state, payload))]
pub async fn generate_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, (axum::http::StatusCode, String)> {
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

    // Make sure the ledger row exists before trying to spend from it.
    UserCredits::get_or_create(&state.db, user.id, &user.email)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "credits lookup failed");
            (axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    let remaining = match UserCredits::spend(&state.db, user.id).await {
        Ok(Some(remaining)) => remaining,
        Ok(None) => {
            warn!(%user_id, "generation refused: no credits remaining");
            return Err((
                axum::http::StatusCode::PAYMENT_REQUIRED,
                "No credits remaining. Please wait for reset.".into(),
            ));
        }
        Err(e) => {
            error!(error = %e, %user_id, "credit spend failed");
            return Err((axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let prompt = build_prompt(&payload.preferences);
    let reply = state.groq.complete(&prompt).await.map_err(|e| {
        error!(error = %e, %user_id, "meal generation failed");
        (
            axum::http::StatusCode::BAD_GATEWAY,
            "Failed to generate a meal. Please try again.".into(),
        )
    })?;

    let meal = parse_generated_meal(&reply).map_err(|e| {
        error!(error = %e, %user_id, "unparseable model reply");
        (axum::http::StatusCode::BAD_GATEWAY, e.to_string())
    })?;

    info!(%user_id, meal = %meal.name, %remaining, "meal generated");
    Ok(Json(GenerateResponse {
        meal,
        credits_remaining: remaining,
    }))
}
