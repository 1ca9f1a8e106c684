use rust_decimal::{Decimal, RoundingStrategy};

/// Sales tax applied on top of the cart subtotal. Tax is currently disabled.
pub const TAX_RATE: Decimal = Decimal::ZERO;

const DECIMAL_PLACES: u32 = 2;

/// Largest base price or flavor cost a cart line may carry.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
/// Largest size multiplier a cart line may carry.
pub const MAX_PRICE_MULTIPLIER: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
/// Largest quantity of a single cart line.
pub const MAX_QUANTITY: u32 = 9999;

/// Round a monetary value to cents, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up_to_cents() {
        assert_eq!(round_money(Decimal::new(10005, 3)), Decimal::new(1001, 2));
        assert_eq!(round_money(Decimal::new(10004, 3)), Decimal::new(1000, 2));
    }
}
