//! The render endpoint.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use sar_core::error::CoreError;
use sar_db::repositories::ServiceConfigurationRepo;
use sar_rendering::request::RenderRequest;

use crate::error::{AppError, AppResult};
use crate::render_service::RenderOutcome;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /api/v1/render`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequestBody {
    /// SAR request id; documents are keyed under it.
    pub id: Uuid,
    pub service_configuration_id: Uuid,
    pub nomis_id: Option<String>,
    pub ndelius_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub sar_case_reference_number: Option<String>,
}

/// Render one service's report for a SAR request.
async fn render(
    State(state): State<AppState>,
    Json(body): Json<RenderRequestBody>,
) -> AppResult<Json<DataResponse<RenderOutcome>>> {
    if body.nomis_id.is_none() && body.ndelius_id.is_none() {
        return Err(AppError::BadRequest(
            "at least one of nomisId or ndeliusId is required".into(),
        ));
    }

    let config = ServiceConfigurationRepo::find_by_id(&state.pool, body.service_configuration_id)
        .await?
        .filter(|config| config.enabled)
        .ok_or(AppError::Core(CoreError::ServiceConfigurationNotFound {
            id: body.service_configuration_id,
        }))?;

    let request = RenderRequest {
        id: Some(body.id),
        nomis_id: body.nomis_id,
        ndelius_id: body.ndelius_id,
        date_from: body.date_from,
        date_to: body.date_to,
        sar_case_reference_number: body.sar_case_reference_number,
        service_configuration: config,
    };

    let outcome = state.render_service.render(&request).await?;
    Ok(Json(DataResponse { data: outcome }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/render", post(render))
}
