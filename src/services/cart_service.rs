use crate::{
    audit,
    domain::cart::{CartLineItem, check_quantity},
    dto::cart::{AddToCartRequest, CartView, OrderItemList},
    error::AppResult,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn view_cart(state: &AppState) -> AppResult<ApiResponse<CartView>> {
    let cart = state.cart.snapshot().await;
    let phase = state.cart.phase().await;
    Ok(ApiResponse::success(
        "OK",
        CartView::new(&cart, phase),
        Some(Meta::empty()),
    ))
}

pub async fn add_to_cart(
    state: &AppState,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    let line = CartLineItem::from(payload);
    line.validate()?;
    let metadata = serde_json::json!({
        "menu_item_id": line.menu_item.id,
        "quantity": line.quantity,
        "custom_design": line.custom_cake_design.is_some(),
    });

    let cart = state.cart.add_item(line).await;
    audit::record(&state.pool, "cart_add", "cart", metadata).await;

    let phase = state.cart.phase().await;
    Ok(ApiResponse::success(
        "OK",
        CartView::new(&cart, phase),
        None,
    ))
}

pub async fn update_quantity(
    state: &AppState,
    menu_item_id: i64,
    quantity: i64,
) -> AppResult<ApiResponse<CartView>> {
    // Zero or less removes the item.
    if quantity > 0 {
        check_quantity(quantity)?;
    }
    let cart = state.cart.update_quantity(menu_item_id, quantity).await;
    audit::record(
        &state.pool,
        "cart_update",
        "cart",
        serde_json::json!({ "menu_item_id": menu_item_id, "quantity": quantity }),
    )
    .await;

    let phase = state.cart.phase().await;
    Ok(ApiResponse::success(
        "OK",
        CartView::new(&cart, phase),
        None,
    ))
}

pub async fn remove_from_cart(
    state: &AppState,
    menu_item_id: i64,
) -> AppResult<ApiResponse<CartView>> {
    let cart = state.cart.remove_item(menu_item_id).await;
    audit::record(
        &state.pool,
        "cart_remove",
        "cart",
        serde_json::json!({ "menu_item_id": menu_item_id }),
    )
    .await;

    let phase = state.cart.phase().await;
    Ok(ApiResponse::success(
        "Removed from cart",
        CartView::new(&cart, phase),
        Some(Meta::empty()),
    ))
}

pub async fn clear_cart(state: &AppState) -> AppResult<ApiResponse<CartView>> {
    let cart = state.cart.clear().await;
    audit::record(&state.pool, "cart_clear", "cart", serde_json::json!({})).await;

    let phase = state.cart.phase().await;
    Ok(ApiResponse::success(
        "Cart cleared",
        CartView::new(&cart, phase),
        Some(Meta::empty()),
    ))
}

pub async fn order_items(state: &AppState) -> AppResult<ApiResponse<OrderItemList>> {
    let items = state.cart.order_items().await;
    Ok(ApiResponse::success(
        "OK",
        OrderItemList { items },
        Some(Meta::empty()),
    ))
}
