//! Checkout money reconciliation: the arithmetic the order workflow uses to
//! verify client-submitted prices and totals.

use rust_decimal::Decimal;

use copper_lily_api::models::order::{ShippingMethod, compute_totals};
use copper_lily_core::{PromoKind, effective_unit_price};

fn dec(s: &str) -> Decimal {
    s.parse().expect("valid decimal literal")
}

#[test]
fn test_checkout_page_scenario() {
    // Two discounted items plus express shipping and a percent promo,
    // mirroring what the checkout page displays: subtotal + shipping - discount.
    let unit_a = effective_unit_price(dec("250.00"), dec("20")); // 200.00
    let unit_b = effective_unit_price(dec("75.00"), Decimal::ZERO); // 75.00

    let totals = compute_totals(
        &[(unit_a, 1), (unit_b, 2)],
        Some((PromoKind::Percent, dec("10"))),
        ShippingMethod::Express.cost(),
    );

    assert_eq!(totals.subtotal, dec("350.00"));
    assert_eq!(totals.discount, dec("35.00"));
    assert_eq!(totals.shipping, dec("60"));
    assert_eq!(totals.total, dec("375.00"));
}

#[test]
fn test_fixed_promo_never_drives_total_below_shipping() {
    let totals = compute_totals(
        &[(dec("30.00"), 1)],
        Some((PromoKind::Fixed, dec("100"))),
        ShippingMethod::Express.cost(),
    );

    // The discount clamps at the subtotal, so only shipping remains.
    assert_eq!(totals.total, dec("60.00"));
}

#[test]
fn test_rounding_follows_display_prices() {
    // A 15% product discount on 19.99 lands on 16.9915; customers see and
    // pay 16.99, and the reconciliation must agree with that.
    let unit = effective_unit_price(dec("19.99"), dec("15"));
    assert_eq!(unit, dec("16.99"));

    let totals = compute_totals(&[(unit, 3)], None, ShippingMethod::Standard.cost());
    assert_eq!(totals.total, dec("50.97"));
}

#[test]
fn test_quantity_multiplies_before_rounding() {
    let totals = compute_totals(
        &[(dec("0.335"), 10)],
        None,
        ShippingMethod::Standard.cost(),
    );
    // 3.35, not 10 * round(0.335) = 3.40
    assert_eq!(totals.subtotal, dec("3.35"));
}
