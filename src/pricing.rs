//! Prices

use rusty_money::{Money, iso::Currency};

/// Convert an amount in minor units into [`Money`] for display.
///
/// Amounts beyond `i64::MAX` minor units saturate.
pub fn to_money(minor_units: u64, currency: &'static Currency) -> Money<'static, Currency> {
    Money::from_minor(i64::try_from(minor_units).unwrap_or(i64::MAX), currency)
}

/// Price of `quantity` units at `unit_price`, saturating on overflow.
pub fn line_total(unit_price: u64, quantity: u32) -> u64 {
    unit_price.saturating_mul(u64::from(quantity))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;

    use super::*;

    #[test]
    fn to_money_uses_minor_units() {
        assert_eq!(to_money(10_00, iso::GBP), Money::from_minor(10_00, iso::GBP));
    }

    #[test]
    fn to_money_saturates() {
        assert_eq!(to_money(u64::MAX, iso::GBP), Money::from_minor(i64::MAX, iso::GBP));
    }

    #[test]
    fn line_total_multiplies_and_saturates() {
        assert_eq!(line_total(1_000, 2), 2_000);
        assert_eq!(line_total(u64::MAX, 2), u64::MAX);
    }
}
