//! Fixed-point money helpers
//!
//! Balances and amounts carry two fractional digits. Values coming from
//! callers are brought to that scale once, at the factory boundary.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits kept for balances and amounts
pub const MONEY_SCALE: u32 = 2;

/// Round a caller-supplied value to money scale
///
/// Uses banker's rounding and always returns a value with exactly
/// [`MONEY_SCALE`] fractional digits, so `1000` becomes `1000.00`.
pub fn to_money(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Format a money value for output (`1500.00`, `-12.50`)
pub fn format_money(value: Decimal) -> String {
    format!("{:.2}", value)
}
