use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::orders::{CheckoutRequest, CheckoutResponse},
    error::AppResult,
    middleware::auth::Authenticated,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn route() -> Router<AppState> {
    Router::new().route("/checkout", post(checkout))
}

#[utoipa::path(
    post,
    path = "/api/orders/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Order created and cart cleared", body = ApiResponse<CheckoutResponse>),
        (status = 400, description = "Cart is empty"),
        (status = 401, description = "No backend session"),
        (status = 502, description = "Backend failed; cart kept"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    session: Authenticated,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutResponse>>> {
    let resp = order_service::checkout(&state, &session, payload).await?;
    Ok(Json(resp))
}
