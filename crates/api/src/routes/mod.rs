//! Route builders.

pub mod health;
pub mod render;
pub mod services;

use axum::Router;

use crate::state::AppState;

/// All `/api/v1` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(render::router())
        .merge(services::router())
}
