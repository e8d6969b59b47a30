//! Money arithmetic shared by the catalog and the checkout workflow.
//!
//! All currency amounts are `rust_decimal::Decimal` rounded to two decimal
//! places. Rounding is away-from-zero at the midpoint, which matches how the
//! storefront displays prices.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::PromoKind;

/// Round an amount to two decimal places (midpoint away from zero).
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// The unit price a customer actually pays for a product: the list price
/// with the product's own percentage discount applied.
#[must_use]
pub fn effective_unit_price(price: Decimal, discount_percent: Decimal) -> Decimal {
    let hundred = Decimal::from(100);
    round_money(price - price * discount_percent / hundred)
}

/// The amount a promo code takes off an order subtotal.
///
/// Percent promos take a percentage of the subtotal; fixed promos take a
/// flat amount, clamped so the discount never exceeds the subtotal itself.
#[must_use]
pub fn promo_discount(kind: PromoKind, magnitude: Decimal, subtotal: Decimal) -> Decimal {
    match kind {
        PromoKind::Percent => round_money(subtotal * magnitude / Decimal::from(100)),
        PromoKind::Fixed => round_money(magnitude.min(subtotal)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("valid decimal literal")
    }

    #[test]
    fn test_round_money_midpoint_away_from_zero() {
        assert_eq!(round_money(dec("1.005")), dec("1.01"));
        assert_eq!(round_money(dec("1.004")), dec("1.00"));
    }

    #[test]
    fn test_effective_unit_price_no_discount() {
        assert_eq!(effective_unit_price(dec("19.99"), Decimal::ZERO), dec("19.99"));
    }

    #[test]
    fn test_effective_unit_price_percent_discount() {
        // 10% off 19.99 = 17.991, rounded to 17.99
        assert_eq!(effective_unit_price(dec("19.99"), dec("10")), dec("17.99"));
        // 50% off 80 = 40
        assert_eq!(effective_unit_price(dec("80"), dec("50")), dec("40.00"));
    }

    #[test]
    fn test_promo_discount_percent() {
        assert_eq!(
            promo_discount(PromoKind::Percent, dec("10"), dec("250")),
            dec("25.00")
        );
    }

    #[test]
    fn test_promo_discount_fixed() {
        assert_eq!(
            promo_discount(PromoKind::Fixed, dec("100"), dec("250")),
            dec("100.00")
        );
    }

    #[test]
    fn test_promo_discount_fixed_clamps_to_subtotal() {
        assert_eq!(
            promo_discount(PromoKind::Fixed, dec("100"), dec("60")),
            dec("60.00")
        );
    }
}
