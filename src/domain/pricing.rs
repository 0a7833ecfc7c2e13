//! Money arithmetic shared by carts and products.
//!
//! Every amount is rounded half-up to two decimal places at the step that
//! produces it. Totals are never rounded once at the end.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept on every stored amount.
pub const MONEY_SCALE: u32 = 2;

/// Subtotals strictly above this ship for free.
pub fn free_shipping_threshold() -> Decimal {
    Decimal::new(50, 0)
}

/// Flat fee charged at or below the free-shipping threshold.
pub fn base_shipping_fee() -> Decimal {
    Decimal::new(599, 2)
}

/// Sales tax applied to the subtotal.
pub fn tax_rate() -> Decimal {
    Decimal::new(8, 2)
}

/// Round half-up (midpoint away from zero) to cents.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

pub fn shipping_for(subtotal: Decimal) -> Decimal {
    if subtotal > free_shipping_threshold() {
        Decimal::ZERO
    } else {
        base_shipping_fee()
    }
}

pub fn tax_for(subtotal: Decimal) -> Decimal {
    round_money(subtotal * tax_rate())
}

/// `percent` of `amount`, rounded to cents.
pub fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    round_money(amount * percent / Decimal::ONE_HUNDRED)
}
