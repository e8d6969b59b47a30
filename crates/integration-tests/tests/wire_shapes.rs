//! Wire-format checks: the JSON the storefront consumes.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::json;

use copper_lily_api::models::order::{ContactInfo, Order, OrderItem};
use copper_lily_api::models::promo::PromoCode;
use copper_lily_core::{OrderId, OrderStatus, ProductId, PromoCodeId, PromoKind, UserId};

fn timestamp() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 15, 9, 30, 0)
        .single()
        .expect("timestamp")
}

#[test]
fn test_order_serializes_camel_case_with_inline_contact() {
    let order = Order {
        id: OrderId::new(12),
        user_id: Some(UserId::new(7)),
        items: vec![OrderItem {
            product_id: ProductId::new(3),
            quantity: 2,
            price: "19.99".parse().expect("decimal"),
        }],
        total: "99.98".parse().expect("decimal"),
        status: OrderStatus::Pending,
        contact: ContactInfo {
            first_name: Some("Nour".to_string()),
            postal_code: Some("11311".to_string()),
            ..ContactInfo::default()
        },
        created_at: timestamp(),
        updated_at: timestamp(),
    };

    let value = serde_json::to_value(&order).expect("serialize");

    assert_eq!(value["userId"], json!(7));
    assert_eq!(value["status"], json!("pending"));
    assert_eq!(value["items"][0]["productId"], json!(3));
    // Contact fields are flattened onto the order, not nested
    assert_eq!(value["firstName"], json!("Nour"));
    assert_eq!(value["postalCode"], json!("11311"));
    assert!(value.get("contact").is_none());
}

#[test]
fn test_guest_order_has_null_user() {
    let order = Order {
        id: OrderId::new(1),
        user_id: None,
        items: vec![],
        total: Decimal::ZERO,
        status: OrderStatus::Pending,
        contact: ContactInfo::default(),
        created_at: timestamp(),
        updated_at: timestamp(),
    };

    let value = serde_json::to_value(&order).expect("serialize");
    assert!(value["userId"].is_null());
}

#[test]
fn test_promo_code_serializes_kind_as_type() {
    let promo = PromoCode {
        id: PromoCodeId::new(4),
        code: "SAVE10".to_string(),
        discount: Decimal::from(10),
        kind: PromoKind::Percent,
        min_order: Decimal::from(100),
        expiry: None,
        usage_limit: Some(200),
        used_count: 12,
        description: None,
        created_at: timestamp(),
        updated_at: timestamp(),
    };

    let value = serde_json::to_value(&promo).expect("serialize");

    assert_eq!(value["type"], json!("percent"));
    assert_eq!(value["minOrder"], json!("100"));
    assert_eq!(value["usageLimit"], json!(200));
    assert_eq!(value["usedCount"], json!(12));
    assert!(value.get("kind").is_none());
}
