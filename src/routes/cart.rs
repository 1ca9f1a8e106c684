use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};

use crate::{
    dto::cart::{AddToCartRequest, CartView, OrderItemList, UpdateQuantityRequest},
    error::AppResult,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(cart_list).post(add_to_cart).delete(clear_cart),
        )
        .route("/order-items", get(order_items))
        .route(
            "/{menu_item_id}",
            patch(update_quantity).delete(remove_from_cart),
        )
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart lines with totals", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn cart_list(State(state): State<AppState>) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::view_cart(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Add item, merging with an identical line", body = ApiResponse<CartView>),
        (status = 400, description = "Bad request"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::add_to_cart(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/cart/{menu_item_id}",
    params(
        ("menu_item_id" = i64, Path, description = "Menu item ID")
    ),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Quantity set; zero or less removes the item", body = ApiResponse<CartView>),
    ),
    tag = "Cart"
)]
pub async fn update_quantity(
    State(state): State<AppState>,
    Path(menu_item_id): Path<i64>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::update_quantity(&state, menu_item_id, payload.quantity).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{menu_item_id}",
    params(
        ("menu_item_id" = i64, Path, description = "Menu item ID")
    ),
    responses(
        (status = 200, description = "Every line for the item removed", body = ApiResponse<CartView>),
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(menu_item_id): Path<i64>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::remove_from_cart(&state, menu_item_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart emptied", body = ApiResponse<CartView>),
    ),
    tag = "Cart"
)]
pub async fn clear_cart(State(state): State<AppState>) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::clear_cart(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/cart/order-items",
    responses(
        (status = 200, description = "Backend-facing projection of the cart", body = ApiResponse<OrderItemList>),
    ),
    tag = "Cart"
)]
pub async fn order_items(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<OrderItemList>>> {
    let resp = cart_service::order_items(&state).await?;
    Ok(Json(resp))
}
