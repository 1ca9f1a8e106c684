use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    backend::{CreatedOrder, PaymentMethod},
    domain::cart::CartSummary,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub order: CreatedOrder,
    /// Kiosk-side figures at the moment of checkout, for comparison with
    /// the backend's totals.
    pub summary: CartSummary,
}
