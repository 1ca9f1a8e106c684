use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::{
        cart::{Cart, CartLineItem, CartSummary, OrderItemPayload},
        catalog::{FlavorSelection, MenuItemRef, SizeSelection},
        design::CakeDesign,
    },
    services::cart_store::StorePhase,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub menu_item: MenuItemRef,
    pub quantity: u32,
    #[serde(default)]
    pub flavor: Option<FlavorSelection>,
    #[serde(default)]
    pub size: Option<SizeSelection>,
    #[serde(default)]
    pub custom_cake_design: Option<CakeDesign>,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

impl From<AddToCartRequest> for CartLineItem {
    fn from(req: AddToCartRequest) -> Self {
        CartLineItem {
            menu_item: req.menu_item,
            quantity: req.quantity,
            flavor: req.flavor,
            size: req.size,
            custom_cake_design: req.custom_cake_design,
            special_instructions: req.special_instructions,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

/// A cart line plus the figures the checkout screen shows for it.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineView {
    #[serde(flatten)]
    pub line: CartLineItem,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub summary: CartSummary,
    pub phase: StorePhase,
}

impl CartView {
    pub fn new(cart: &Cart, phase: StorePhase) -> Self {
        let items = cart
            .lines()
            .iter()
            .map(|line| CartLineView {
                line: line.clone(),
                unit_price: line.unit_price(),
                line_total: line.line_total(),
            })
            .collect();
        Self {
            items,
            summary: cart.summary(),
            phase,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemList {
    pub items: Vec<OrderItemPayload>,
}
