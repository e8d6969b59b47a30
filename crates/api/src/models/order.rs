//! Order domain types and checkout total arithmetic.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use copper_lily_core::{OrderId, OrderStatus, ProductId, PromoKind, UserId, promo_discount, round_money};

/// An order line item: the product reference plus the unit price the
/// customer was charged at order time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
}

/// Contact and shipping fields captured at checkout.
///
/// Stored inline on the order (not via a Customer reference), matching how
/// the storefront submits them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

/// A persisted order. Immutable after creation except for `status`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Absent for guest checkout.
    pub user_id: Option<UserId>,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub status: OrderStatus,
    #[serde(flatten)]
    pub contact: ContactInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shipping method picked at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMethod {
    #[default]
    Express,
    Standard,
}

impl ShippingMethod {
    /// Flat shipping cost for this method.
    #[must_use]
    pub fn cost(self) -> Decimal {
        match self {
            Self::Express => Decimal::from(60),
            Self::Standard => Decimal::ZERO,
        }
    }
}

/// One line of a checkout submission.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub product_id: ProductId,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    /// Unit price the client believes it is paying; verified against the
    /// live catalog before anything is written.
    pub price: Decimal,
}

/// Request body for `POST /api/orders`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[validate(length(min = 1, message = "Order must contain at least one item"))]
    pub items: Vec<CheckoutItem>,
    /// Client-computed total; verified against the recomputed total.
    pub total: Decimal,
    pub promo_code: Option<String>,
    #[serde(default)]
    pub shipping_method: ShippingMethod,
    /// Client-generated token deduplicating retried submissions.
    pub idempotency_key: Uuid,
    #[serde(flatten)]
    #[validate]
    pub contact: ContactInfo,
}

/// Request body for `PUT /api/orders/:id/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// The server-side reconciliation of an order's money amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

/// Recompute an order's totals from effective unit prices.
///
/// `lines` pairs each live effective unit price with the ordered quantity.
/// The promo discount applies to the subtotal only; shipping is added after.
#[must_use]
pub fn compute_totals(
    lines: &[(Decimal, i32)],
    promo: Option<(PromoKind, Decimal)>,
    shipping: Decimal,
) -> OrderTotals {
    let subtotal = round_money(
        lines
            .iter()
            .map(|(price, quantity)| *price * Decimal::from(*quantity))
            .sum(),
    );
    let discount = promo.map_or(Decimal::ZERO, |(kind, magnitude)| {
        promo_discount(kind, magnitude, subtotal)
    });
    let total = round_money(subtotal - discount + shipping);
    OrderTotals {
        subtotal,
        discount,
        shipping,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("valid decimal literal")
    }

    #[test]
    fn test_totals_without_promo() {
        // 2 x 19.99 + 1 x 45.50 = 85.48, plus express shipping
        let totals = compute_totals(
            &[(dec("19.99"), 2), (dec("45.50"), 1)],
            None,
            ShippingMethod::Express.cost(),
        );
        assert_eq!(totals.subtotal, dec("85.48"));
        assert_eq!(totals.discount, Decimal::ZERO);
        assert_eq!(totals.total, dec("145.48"));
    }

    #[test]
    fn test_totals_with_percent_promo() {
        let totals = compute_totals(
            &[(dec("100.00"), 2)],
            Some((PromoKind::Percent, dec("10"))),
            ShippingMethod::Standard.cost(),
        );
        assert_eq!(totals.subtotal, dec("200.00"));
        assert_eq!(totals.discount, dec("20.00"));
        assert_eq!(totals.total, dec("180.00"));
    }

    #[test]
    fn test_totals_with_fixed_promo_applies_before_shipping() {
        let totals = compute_totals(
            &[(dec("40.00"), 1)],
            Some((PromoKind::Fixed, dec("100"))),
            ShippingMethod::Express.cost(),
        );
        // Fixed discount clamps to the subtotal; shipping is still owed.
        assert_eq!(totals.discount, dec("40.00"));
        assert_eq!(totals.total, dec("60.00"));
    }

    #[test]
    fn test_shipping_method_costs() {
        assert_eq!(ShippingMethod::Express.cost(), Decimal::from(60));
        assert_eq!(ShippingMethod::Standard.cost(), Decimal::ZERO);
    }

    #[test]
    fn test_checkout_request_rejects_empty_items() {
        let request = CheckoutRequest {
            items: vec![],
            total: Decimal::ZERO,
            promo_code: None,
            shipping_method: ShippingMethod::Standard,
            idempotency_key: Uuid::new_v4(),
            contact: ContactInfo::default(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_checkout_item_rejects_zero_quantity() {
        let item = CheckoutItem {
            product_id: ProductId::new(1),
            quantity: 0,
            price: dec("10.00"),
        };
        assert!(item.validate().is_err());

        let item = CheckoutItem {
            product_id: ProductId::new(1),
            quantity: 1,
            price: dec("10.00"),
        };
        assert!(item.validate().is_ok());
    }
}
