use axum::Router;

use crate::state::AppState;

pub mod client;
pub mod dto;
pub mod handlers;
pub mod parse;
pub mod prompt;

pub use client::{GroqClient, GroqError};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::generator_routes())
}
