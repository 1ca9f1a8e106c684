use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MenuItemStatus {
    Available,
    OutOfStock,
    /// Any status the backend reports that we do not know about is treated
    /// as not sellable.
    #[serde(other)]
    Unavailable,
}

/// A catalog entry as served by the backend menu endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    pub current_price: Decimal,
    pub status: MenuItemStatus,
    #[serde(default)]
    pub is_infinite_stock: bool,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub image: Option<String>,
}

impl MenuItem {
    pub fn is_orderable(&self) -> bool {
        self.status == MenuItemStatus::Available
            && (self.is_infinite_stock || self.stock_quantity > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MenuItemKind {
    Cake,
    Pastry,
    Bread,
    Beverage,
    CustomCake,
    #[serde(other)]
    Other,
}

/// The slice of a catalog item a cart line needs to price itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuItemRef {
    pub id: i64,
    pub name: String,
    pub base_price: Decimal,
    pub kind: MenuItemKind,
}

impl MenuItemRef {
    pub fn from_menu_item(item: &MenuItem, kind: MenuItemKind) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            base_price: item.current_price,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FlavorSelection {
    pub id: i64,
    pub name: String,
    pub additional_cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SizeSelection {
    pub id: i64,
    pub name: String,
    pub price_multiplier: Decimal,
}
