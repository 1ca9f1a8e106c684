use crate::{
    dto::menu::{CategoryList, MenuList},
    error::AppResult,
    response::{ApiResponse, Meta},
    routes::params::MenuQuery,
    state::AppState,
};

pub async fn list_menu(state: &AppState, query: MenuQuery) -> AppResult<ApiResponse<MenuList>> {
    let include_unavailable = query.include_unavailable.unwrap_or(false);
    let items: Vec<_> = state
        .backend
        .list_menu_items()
        .await?
        .into_iter()
        .filter(|item| query.category_id.is_none() || item.category_id == query.category_id)
        .filter(|item| include_unavailable || item.is_orderable())
        .collect();

    let meta = Meta::single_page(items.len());
    Ok(ApiResponse::success("OK", MenuList { items }, Some(meta)))
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = state.backend.list_categories().await?;
    let meta = Meta::single_page(items.len());
    Ok(ApiResponse::success("OK", CategoryList { items }, Some(meta)))
}
