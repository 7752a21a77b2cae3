use std::sync::Arc;

use crate::config::ServerConfig;
use crate::render_service::RenderService;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: sar_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The orchestrating render service.
    pub render_service: Arc<RenderService>,
}
