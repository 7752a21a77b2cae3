//! Read-only service configuration listing.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use sar_db::models::ServiceConfiguration;
use sar_db::repositories::ServiceConfigurationRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// List enabled services in display order.
async fn list_services(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ServiceConfiguration>>>> {
    let services = ServiceConfigurationRepo::list_enabled(&state.pool).await?;
    Ok(Json(DataResponse { data: services }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/services", get(list_services))
}
