//! Cart aggregate.
//!
//! Lines are merged on `(menu item, flavor, size)` unless they carry a custom
//! cake design; designed cakes are always their own line. All money figures
//! follow the backend formula so the kiosk total matches the charged total:
//! `(base + flavor cost + design surcharge) * size multiplier * quantity`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::{
    catalog::{FlavorSelection, MenuItemRef, SizeSelection},
    design::CakeDesign,
    money::{MAX_PRICE, MAX_PRICE_MULTIPLIER, MAX_QUANTITY, TAX_RATE, round_money},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineItemError {
    #[error("quantity must be between 1 and {max}, got {0}", max = MAX_QUANTITY)]
    Quantity(i64),

    #[error("{field} must be between 0 and {max}, got {value}", max = MAX_PRICE)]
    Price { field: &'static str, value: Decimal },

    #[error(
        "price_multiplier must be greater than 0 and at most {max}, got {0}",
        max = MAX_PRICE_MULTIPLIER
    )]
    Multiplier(Decimal),
}

/// Quantity bounds shared by adds and quantity updates.
pub fn check_quantity(quantity: i64) -> Result<(), LineItemError> {
    if (1..=i64::from(MAX_QUANTITY)).contains(&quantity) {
        Ok(())
    } else {
        Err(LineItemError::Quantity(quantity))
    }
}

fn check_price(field: &'static str, value: Decimal) -> Result<(), LineItemError> {
    if value.is_sign_negative() || value > MAX_PRICE {
        return Err(LineItemError::Price { field, value });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartLineItem {
    pub menu_item: MenuItemRef,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor: Option<FlavorSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_cake_design: Option<CakeDesign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

type MergeKey = (i64, Option<i64>, Option<i64>);

impl CartLineItem {
    pub fn new(menu_item: MenuItemRef, quantity: u32) -> Self {
        Self {
            menu_item,
            quantity,
            flavor: None,
            size: None,
            custom_cake_design: None,
            special_instructions: None,
        }
    }

    /// Wrap a finished design into its own cart line.
    pub fn custom_cake(menu_item: MenuItemRef, design: CakeDesign) -> Self {
        let special_instructions = design.special_instructions.clone();
        Self {
            custom_cake_design: Some(design),
            special_instructions,
            ..Self::new(menu_item, 1)
        }
    }

    /// `None` for designed cakes, which never merge.
    fn merge_key(&self) -> Option<MergeKey> {
        if self.custom_cake_design.is_some() {
            return None;
        }
        Some((
            self.menu_item.id,
            self.flavor.as_ref().map(|f| f.id),
            self.size.as_ref().map(|s| s.id),
        ))
    }

    /// Reject figures outside what the kiosk sells. Lines that pass can be
    /// priced without overflow.
    pub fn validate(&self) -> Result<(), LineItemError> {
        check_quantity(i64::from(self.quantity))?;
        check_price("base_price", self.menu_item.base_price)?;
        if let Some(flavor) = &self.flavor {
            check_price("additional_cost", flavor.additional_cost)?;
        }
        if let Some(size) = &self.size {
            let multiplier = size.price_multiplier;
            if multiplier <= Decimal::ZERO || multiplier > MAX_PRICE_MULTIPLIER {
                return Err(LineItemError::Multiplier(multiplier));
            }
        }
        Ok(())
    }

    /// Saturates instead of overflowing, so a stored line with absurd figures
    /// prices as `Decimal::MAX` rather than panicking.
    pub fn unit_price(&self) -> Decimal {
        let flavor_cost = self
            .flavor
            .as_ref()
            .map_or(Decimal::ZERO, |f| f.additional_cost);
        let surcharge = self
            .custom_cake_design
            .as_ref()
            .map_or(Decimal::ZERO, CakeDesign::complexity_surcharge);
        let multiplier = self
            .size
            .as_ref()
            .map_or(Decimal::ONE, |s| s.price_multiplier);

        self.menu_item
            .base_price
            .saturating_add(flavor_cost)
            .saturating_add(surcharge)
            .saturating_mul(multiplier)
    }

    pub fn line_total(&self) -> Decimal {
        self.unit_price().saturating_mul(Decimal::from(self.quantity))
    }

    pub fn to_order_item(&self) -> OrderItemPayload {
        OrderItemPayload {
            menu_item_id: self.menu_item.id,
            quantity: self.quantity,
            flavor_id: self.flavor.as_ref().map(|f| f.id),
            size_id: self.size.as_ref().map(|s| s.id),
            custom_cake_design: self.custom_cake_design.clone(),
            special_instructions: self.special_instructions.clone(),
        }
    }
}

/// Backend-facing projection of a cart line: identifiers and selections only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItemPayload {
    pub menu_item_id: i64,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flavor_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_cake_design: Option<CakeDesign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CartSummary {
    pub item_count: u64,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// The shopper's pending order. Serializes as the bare list of lines, which
/// is also its storage format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: Vec<CartLineItem>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn add_item(&mut self, item: CartLineItem) {
        if item.quantity == 0 {
            return;
        }

        if let Some(key) = item.merge_key() {
            if let Some(existing) = self
                .lines
                .iter_mut()
                .find(|line| line.merge_key() == Some(key))
            {
                existing.quantity = existing
                    .quantity
                    .saturating_add(item.quantity)
                    .min(MAX_QUANTITY);
                return;
            }
        }

        self.lines.push(item);
    }

    pub fn remove_item(&mut self, menu_item_id: i64) {
        self.lines.retain(|line| line.menu_item.id != menu_item_id);
    }

    pub fn update_quantity(&mut self, menu_item_id: i64, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(menu_item_id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX).min(MAX_QUANTITY);
        for line in self
            .lines
            .iter_mut()
            .filter(|line| line.menu_item.id == menu_item_id)
        {
            line.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn contains(&self, menu_item_id: i64) -> bool {
        self.lines
            .iter()
            .any(|line| line.menu_item.id == menu_item_id)
    }

    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn subtotal(&self) -> Decimal {
        let sum = self
            .lines
            .iter()
            .map(CartLineItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        round_money(sum)
    }

    pub fn tax(&self) -> Decimal {
        round_money(self.subtotal().saturating_mul(TAX_RATE))
    }

    pub fn total(&self) -> Decimal {
        self.subtotal().saturating_add(self.tax())
    }

    pub fn summary(&self) -> CartSummary {
        let subtotal = self.subtotal();
        let tax = round_money(subtotal.saturating_mul(TAX_RATE));
        CartSummary {
            item_count: self.item_count(),
            subtotal,
            tax,
            total: subtotal.saturating_add(tax),
        }
    }

    pub fn order_items(&self) -> Vec<OrderItemPayload> {
        self.lines.iter().map(CartLineItem::to_order_item).collect()
    }

    /// Take out what an order already covered. Quantities added to a line
    /// after the order snapshot stay in the cart.
    pub fn remove_ordered(&mut self, ordered: &[CartLineItem]) {
        for done in ordered {
            let position = match done.merge_key() {
                Some(key) => self
                    .lines
                    .iter()
                    .position(|line| line.merge_key() == Some(key)),
                None => self.lines.iter().position(|line| line == done),
            };
            let Some(index) = position else {
                continue;
            };
            let line = &mut self.lines[index];
            if line.quantity > done.quantity {
                line.quantity -= done.quantity;
            } else {
                self.lines.remove(index);
            }
        }
    }

    /// Drop lines that fail [`CartLineItem::validate`], returning how many.
    pub fn retain_valid(&mut self) -> usize {
        let before = self.lines.len();
        self.lines.retain(|line| line.validate().is_ok());
        before - self.lines.len()
    }
}
