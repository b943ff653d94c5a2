//! Derived views over a cart: badge count and totals.
use crate::cart::Cart;
use rust_decimal::{Decimal, RoundingStrategy};

/// Total number of units in the cart (the badge number).
#[must_use]
pub fn item_count(cart: &Cart) -> u64 {
    cart.items()
        .iter()
        .map(|item| u64::from(item.quantity))
        .sum()
}

/// Sum of `unit_price * quantity` over every line, unrounded.
///
/// Amounts past `Decimal::MAX` saturate instead of overflowing.
#[must_use]
pub fn total(cart: &Cart) -> Decimal {
    cart.items()
        .iter()
        .map(crate::cart::CartItem::subtotal)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Round an amount to cents for display. Half-way values round away from zero.
#[must_use]
pub fn round_for_display(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Format an amount as shown on the storefront, e.g. `R$ 29.97`.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    format!("R$ {}", round_for_display(amount))
}
