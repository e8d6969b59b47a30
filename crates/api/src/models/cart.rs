//! Cart domain types.
//!
//! A cart is a per-user snapshot: denormalized line items captured at
//! add-to-cart time, wholly replaced on every save. Quantities and prices are
//! deliberately not validated here - the order workflow re-derives both from
//! the live catalog at checkout.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use copper_lily_core::{CartId, ProductId, UserId};

/// A denormalized cart line item (product snapshot, not live-joined).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: i32,
    /// Unit price at the time the item was added.
    pub price: Decimal,
    pub size: Option<String>,
    pub image: Option<String>,
}

/// A stored cart, keyed by its owning user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub items: Vec<CartItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /api/cart/:userId` - a full replacement item list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSaveRequest {
    pub items: Vec<CartItem>,
}
