use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    audit::{AuditEntry, list_audit_logs},
    error::AppResult,
    response::{ApiResponse, Meta},
    routes::params::{AuditQuery, SortOrder},
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct AuditLogList {
    pub items: Vec<AuditEntry>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_audit))
}

#[utoipa::path(
    get,
    path = "/api/audit",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "Local audit trail", body = ApiResponse<AuditLogList>)
    ),
    tag = "Audit"
)]
pub async fn list_audit(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> AppResult<Json<ApiResponse<AuditLogList>>> {
    let (page, limit, offset) = query.pagination().normalize();
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let (items, total) =
        list_audit_logs(&state.orm, sort_order, limit as u64, offset as u64).await?;

    let meta = Meta::new(page, limit, total as i64);
    Ok(Json(ApiResponse::success(
        "OK",
        AuditLogList { items },
        Some(meta),
    )))
}
