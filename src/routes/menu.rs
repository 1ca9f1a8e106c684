use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::menu::{CategoryList, MenuList},
    error::AppResult,
    response::ApiResponse,
    routes::params::MenuQuery,
    services::menu_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_menu))
        .route("/categories", get(list_categories))
}

#[utoipa::path(
    get,
    path = "/api/menu",
    params(
        ("category_id" = Option<i64>, Query, description = "Only items in this category"),
        ("include_unavailable" = Option<bool>, Query, description = "Also list items that cannot be ordered, default false")
    ),
    responses(
        (status = 200, description = "Menu items", body = ApiResponse<MenuList>),
        (status = 502, description = "Backend unavailable"),
    ),
    tag = "Menu"
)]
pub async fn list_menu(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<ApiResponse<MenuList>>> {
    let resp = menu_service::list_menu(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/menu/categories",
    responses(
        (status = 200, description = "Menu categories", body = ApiResponse<CategoryList>),
        (status = 502, description = "Backend unavailable"),
    ),
    tag = "Menu"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = menu_service::list_categories(&state).await?;
    Ok(Json(resp))
}
