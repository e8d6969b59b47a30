//! Domain types for the catalog, cart, promo, and order workflow.
//!
//! These types represent validated domain objects separate from database row
//! types. Request DTOs live here too, carrying their boundary validation
//! rules; route handlers validate before any persistence call.

pub mod analytics;
pub mod cart;
pub mod order;
pub mod product;
pub mod promo;

use rust_decimal::Decimal;
use validator::ValidationError;

/// Validator hook: currency amounts must not be negative.
///
/// # Errors
///
/// Returns a `ValidationError` with code `negative` when the amount is below
/// zero.
pub fn validate_non_negative(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() {
        return Err(ValidationError::new("negative"));
    }
    Ok(())
}

/// Validator hook: discount percentages must fall within 0..=100.
///
/// # Errors
///
/// Returns a `ValidationError` with code `percentage` when the value is
/// outside the range.
pub fn validate_percentage(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() || *value > Decimal::from(100) {
        return Err(ValidationError::new("percentage"));
    }
    Ok(())
}
