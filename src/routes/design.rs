use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    domain::{design::DesignPatch, wizard::DesignWizard},
    dto::design::{ResetDesignRequest, SubmitDesignResponse},
    error::AppResult,
    response::ApiResponse,
    services::design_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(current_design).patch(update_design))
        .route("/next", post(next_step))
        .route("/back", post(previous_step))
        .route("/submit", post(submit_design))
        .route("/reset", post(reset_design))
}

#[utoipa::path(
    get,
    path = "/api/design",
    responses(
        (status = 200, description = "Current wizard step and design", body = ApiResponse<DesignWizard>)
    ),
    tag = "Design"
)]
pub async fn current_design(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<DesignWizard>>> {
    let resp = design_service::current(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/design",
    request_body = DesignPatch,
    responses(
        (status = 200, description = "Fields merged into the design", body = ApiResponse<DesignWizard>),
        (status = 422, description = "Design already submitted"),
    ),
    tag = "Design"
)]
pub async fn update_design(
    State(state): State<AppState>,
    Json(patch): Json<DesignPatch>,
) -> AppResult<Json<ApiResponse<DesignWizard>>> {
    let resp = design_service::update_design(&state, patch).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/design/next",
    responses(
        (status = 200, description = "Moved to the next step", body = ApiResponse<DesignWizard>),
        (status = 422, description = "Current step is incomplete"),
    ),
    tag = "Design"
)]
pub async fn next_step(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<DesignWizard>>> {
    let resp = design_service::next_step(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/design/back",
    responses(
        (status = 200, description = "Moved to the previous step", body = ApiResponse<DesignWizard>),
        (status = 422, description = "Design already submitted"),
    ),
    tag = "Design"
)]
pub async fn previous_step(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<DesignWizard>>> {
    let resp = design_service::previous_step(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/design/submit",
    responses(
        (status = 200, description = "Design accepted by the backend", body = ApiResponse<SubmitDesignResponse>),
        (status = 422, description = "Not on the review step, or design incomplete"),
        (status = 502, description = "Backend rejected or unreachable; design kept for resubmission"),
    ),
    tag = "Design"
)]
pub async fn submit_design(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<SubmitDesignResponse>>> {
    let resp = design_service::submit(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/design/reset",
    request_body = ResetDesignRequest,
    responses(
        (status = 200, description = "Fresh design at the first step", body = ApiResponse<DesignWizard>)
    ),
    tag = "Design"
)]
pub async fn reset_design(
    State(state): State<AppState>,
    body: Option<Json<ResetDesignRequest>>,
) -> AppResult<Json<ApiResponse<DesignWizard>>> {
    let request = body.map(|Json(req)| req).unwrap_or_default();
    let resp = design_service::reset(&state, request.target()).await?;
    Ok(Json(resp))
}
