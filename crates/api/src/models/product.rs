//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use copper_lily_core::ProductId;

/// A catalog product.
///
/// `stock` is mutated both by admin updates and, with a floor check, by the
/// order workflow.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    pub name: String,
    /// List price before the product's own discount.
    pub price: Decimal,
    /// Ordered image URIs.
    pub images: Vec<String>,
    pub description: Option<String>,
    /// Free-text category label.
    pub category: String,
    /// Units on hand; never below zero.
    pub stock: i32,
    /// Percentage discount applied to the list price.
    pub discount: Decimal,
    pub featured: bool,
    /// Marketing bullet points; at least three.
    pub features: Vec<String>,
    pub shipping_info: Option<String>,
    pub shipping_cost: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The unit price a customer pays right now.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        copper_lily_core::effective_unit_price(self.price, self.discount)
    }
}

/// Request body for creating or fully updating a product.
///
/// Missing `discount` defaults to 0 and missing `featured` to false; the
/// three-feature floor is enforced here, before any persistence call.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: String,
    #[validate(custom = "super::validate_non_negative")]
    pub price: Decimal,
    #[serde(default)]
    pub images: Vec<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,
    #[serde(default)]
    #[validate(custom = "super::validate_percentage")]
    pub discount: Decimal,
    #[serde(default)]
    pub featured: bool,
    #[validate(length(min = 3, message = "At least 3 features required"))]
    pub features: Vec<String>,
    pub shipping_info: Option<String>,
    #[serde(default)]
    #[validate(custom = "super::validate_non_negative")]
    pub shipping_cost: Decimal,
}

/// Filter for catalog listings.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Exact category label match.
    pub category: Option<String>,
    /// When true, only featured products.
    pub featured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(features: Vec<String>) -> ProductInput {
        ProductInput {
            name: "Silk Scarf".to_string(),
            price: Decimal::from(120),
            images: vec![],
            description: None,
            category: "accessories".to_string(),
            stock: 5,
            discount: Decimal::ZERO,
            featured: false,
            features,
            shipping_info: None,
            shipping_cost: Decimal::ZERO,
        }
    }

    #[test]
    fn test_two_features_fail_validation() {
        let result = input(vec!["soft".to_string(), "light".to_string()]).validate();
        assert!(result.is_err());
        let rendered = format!("{}", result.expect_err("validation error"));
        assert!(rendered.contains("At least 3 features required"));
    }

    #[test]
    fn test_three_features_pass_validation() {
        let result = input(vec![
            "soft".to_string(),
            "light".to_string(),
            "hand-rolled hem".to_string(),
        ])
        .validate();
        assert!(result.is_ok());
    }

    #[test]
    fn test_negative_price_fails_validation() {
        let mut bad = input(vec!["a".into(), "b".into(), "c".into()]);
        bad.price = Decimal::from(-1);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_effective_price_applies_discount() {
        let product = Product {
            id: ProductId::new(1),
            name: "Silk Scarf".to_string(),
            price: Decimal::from(200),
            images: vec![],
            description: None,
            category: "accessories".to_string(),
            stock: 3,
            discount: Decimal::from(25),
            featured: false,
            features: vec![],
            shipping_info: None,
            shipping_cost: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(product.effective_price(), "150.00".parse().expect("decimal"));
    }
}
