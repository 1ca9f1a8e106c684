use crate::{
    audit,
    backend::CreateOrderRequest,
    dto::orders::{CheckoutRequest, CheckoutResponse},
    error::{AppError, AppResult},
    middleware::auth::Authenticated,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Send the cart to the backend as an order. The ordered lines leave the
/// cart only once the backend has created the order; any failure leaves it as
/// it was.
pub async fn checkout(
    state: &AppState,
    _session: &Authenticated,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<CheckoutResponse>> {
    let cart = state.cart.snapshot().await;
    if cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let summary = cart.summary();
    let request = CreateOrderRequest {
        items: cart.order_items(),
        payment_method: payload.payment_method,
    };

    let order = match state.backend.create_order(&request).await {
        Ok(order) => order,
        Err(err) => {
            tracing::warn!(error = %err, "order submission failed");
            return Err(err.into());
        }
    };

    if order.total != summary.total {
        tracing::warn!(
            order_id = order.order_id,
            kiosk_total = %summary.total,
            backend_total = %order.total,
            "backend total differs from kiosk estimate"
        );
    }

    // Lines added while the order was in flight stay for the next order.
    state.cart.remove_ordered(cart.lines()).await;

    audit::record(
        &state.pool,
        "checkout",
        "orders",
        serde_json::json!({
            "order_id": order.order_id,
            "verification_code": order.verification_code,
            "total": order.total,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Checkout success",
        CheckoutResponse { order, summary },
        Some(Meta::empty()),
    ))
}
