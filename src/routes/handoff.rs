use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::handoff::HandoffView,
    error::AppResult,
    response::ApiResponse,
    services::handoff_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        post(start_handoff).get(handoff_status).delete(cancel_handoff),
    )
}

#[utoipa::path(
    post,
    path = "/api/handoff",
    responses(
        (status = 200, description = "Session opened; QR data returned and polling started", body = ApiResponse<HandoffView>),
        (status = 502, description = "Backend unavailable"),
    ),
    tag = "Handoff"
)]
pub async fn start_handoff(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<HandoffView>>> {
    let resp = handoff_service::start_handoff(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/handoff",
    responses(
        (status = 200, description = "Last observed session status", body = ApiResponse<HandoffView>)
    ),
    tag = "Handoff"
)]
pub async fn handoff_status(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<HandoffView>>> {
    let resp = handoff_service::handoff_status(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/handoff",
    responses(
        (status = 200, description = "Polling stopped and session cancelled", body = ApiResponse<HandoffView>)
    ),
    tag = "Handoff"
)]
pub async fn cancel_handoff(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<HandoffView>>> {
    let resp = handoff_service::cancel_handoff(&state).await?;
    Ok(Json(resp))
}
