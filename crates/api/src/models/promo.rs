//! Promo code domain types and the checkout-time redemption rules.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use copper_lily_core::PromoCodeId;

use crate::error::AppError;

/// A registered promo code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCode {
    pub id: PromoCodeId,
    /// Case-sensitive redemption code.
    pub code: String,
    /// Discount magnitude; interpretation depends on `kind`.
    pub discount: Decimal,
    #[serde(rename = "type")]
    pub kind: copper_lily_core::PromoKind,
    /// Order subtotal floor for redemption.
    pub min_order: Decimal,
    pub expiry: Option<DateTime<Utc>>,
    pub usage_limit: Option<i32>,
    pub used_count: i32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Why a promo code cannot be redeemed.
///
/// Each rejection maps to a distinct client-visible message; the check order
/// in [`PromoCode::check_redeemable`] keeps those messages deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromoRejection {
    #[error("Promo code expired")]
    Expired,
    #[error("Promo code usage limit reached")]
    UsageLimitReached,
    #[error("Minimum order value is {0}")]
    BelowMinimum(Decimal),
}

impl From<PromoRejection> for AppError {
    fn from(rejection: PromoRejection) -> Self {
        Self::BadRequest(rejection.to_string())
    }
}

/// The sequential redemption checks, shared by the public validation
/// endpoint and the checkout workflow.
///
/// First failure wins: expiry, then usage limit, then minimum order. The
/// expiry check is strictly "after", so `now == expiry` is accepted; an
/// order total equal to `min_order` is accepted too.
///
/// # Errors
///
/// Returns the first failing [`PromoRejection`].
pub fn check_redemption(
    expiry: Option<DateTime<Utc>>,
    usage_limit: Option<i32>,
    used_count: i32,
    min_order: Decimal,
    order_total: Decimal,
    now: DateTime<Utc>,
) -> Result<(), PromoRejection> {
    if let Some(expiry) = expiry
        && now > expiry
    {
        return Err(PromoRejection::Expired);
    }
    if let Some(limit) = usage_limit
        && used_count >= limit
    {
        return Err(PromoRejection::UsageLimitReached);
    }
    if order_total < min_order {
        return Err(PromoRejection::BelowMinimum(min_order));
    }
    Ok(())
}

impl PromoCode {
    /// Run the redemption checks against an order total. Pure read - this
    /// never touches `used_count`.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`PromoRejection`].
    pub fn check_redeemable(
        &self,
        order_total: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), PromoRejection> {
        check_redemption(
            self.expiry,
            self.usage_limit,
            self.used_count,
            self.min_order,
            order_total,
            now,
        )
    }
}

/// Request body for creating or updating a promo code.
///
/// `usedCount` is deliberately absent: the counter belongs to the order
/// workflow, not to admin edits.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PromoInput {
    #[validate(length(min = 1, message = "Promo code is required"))]
    pub code: String,
    #[validate(custom = "super::validate_non_negative")]
    pub discount: Decimal,
    #[serde(rename = "type", default)]
    pub kind: copper_lily_core::PromoKind,
    #[serde(default)]
    #[validate(custom = "super::validate_non_negative")]
    pub min_order: Decimal,
    pub expiry: Option<DateTime<Utc>>,
    #[validate(range(min = 1, message = "Usage limit must be positive"))]
    pub usage_limit: Option<i32>,
    pub description: Option<String>,
}

/// Request body for `POST /api/promocodes/validate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatePromoRequest {
    pub code: String,
    pub order_total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use copper_lily_core::PromoKind;

    fn promo() -> PromoCode {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().expect("timestamp");
        PromoCode {
            id: PromoCodeId::new(1),
            code: "SAVE10".to_string(),
            discount: Decimal::from(10),
            kind: PromoKind::Percent,
            min_order: Decimal::from(100),
            expiry: None,
            usage_limit: None,
            used_count: 0,
            description: None,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let expiry = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).single().expect("timestamp");
        let mut p = promo();
        p.expiry = Some(expiry);

        // Exactly at expiry: still redeemable (check is strictly "after")
        assert_eq!(p.check_redeemable(Decimal::from(200), expiry), Ok(()));
        // One second later: expired
        let after = expiry + chrono::Duration::seconds(1);
        assert_eq!(
            p.check_redeemable(Decimal::from(200), after),
            Err(PromoRejection::Expired)
        );
    }

    #[test]
    fn test_usage_limit_reached_regardless_of_total() {
        let mut p = promo();
        p.usage_limit = Some(5);
        p.used_count = 5;
        assert_eq!(
            p.check_redeemable(Decimal::from(1_000_000), Utc::now()),
            Err(PromoRejection::UsageLimitReached)
        );
    }

    #[test]
    fn test_one_use_remaining_proceeds_to_minimum_check() {
        let mut p = promo();
        p.usage_limit = Some(5);
        p.used_count = 4;
        assert_eq!(
            p.check_redeemable(Decimal::from(99), Utc::now()),
            Err(PromoRejection::BelowMinimum(Decimal::from(100)))
        );
        assert_eq!(p.check_redeemable(Decimal::from(150), Utc::now()), Ok(()));
    }

    #[test]
    fn test_minimum_order_boundary_is_inclusive() {
        let p = promo();
        assert_eq!(p.check_redeemable(Decimal::from(100), Utc::now()), Ok(()));
        assert_eq!(
            p.check_redeemable("99.99".parse().expect("decimal"), Utc::now()),
            Err(PromoRejection::BelowMinimum(Decimal::from(100)))
        );
    }

    #[test]
    fn test_below_minimum_message_names_the_floor() {
        let message = PromoRejection::BelowMinimum(Decimal::from(100)).to_string();
        assert!(message.contains("100"));
    }

    #[test]
    fn test_expiry_checked_before_usage_limit() {
        let expiry = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).single().expect("timestamp");
        let mut p = promo();
        p.expiry = Some(expiry);
        p.usage_limit = Some(1);
        p.used_count = 1;

        let after = expiry + chrono::Duration::days(1);
        assert_eq!(
            p.check_redeemable(Decimal::ZERO, after),
            Err(PromoRejection::Expired)
        );
    }
}
