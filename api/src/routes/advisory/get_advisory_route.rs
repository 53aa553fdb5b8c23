//! POST /get-advisory: answers a farmer's question from their own data.

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::HeaderMap,
};
use tracing::{debug, info, instrument};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    middleware_layer::json_extractor::REQUEST_ID_HEADER,
    routes::advisory::advisory_request::{AdvisoryRequest, AdvisoryResponse},
};

/// Handler: POST /get-advisory
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/get-advisory \
///   -H 'content-type: application/json' \
///   -d '{"farmer_data":{"crop":"wheat","soil":"loamy"},"question":"When should I irrigate?"}'
/// ```
#[instrument(
    name = "get_advisory_route",
    skip_all,
    fields(keys = body.farmer_data.len())
)]
pub async fn get_advisory(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<AdvisoryRequest>,
) -> AppResult<Json<AdvisoryResponse>> {
    if let Some(id) = headers.get(REQUEST_ID_HEADER).and_then(|h| h.to_str().ok()) {
        debug!(%id, "request id attached");
    }
    info!(question = %body.question, "advisory requested");

    let advisory = state
        .advisory
        .get_advisory(&body.farmer_data, &body.question)
        .await?;

    Ok(Json(AdvisoryResponse { advisory }))
}
