use axum::Router;

use crate::state::AppState;

pub mod client;
pub mod dto;
pub mod handlers;

pub use client::{UsdaClient, UsdaError};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::food_routes())
}
