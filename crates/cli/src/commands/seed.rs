//! Seed command: sample catalog and promo data for local development.
//!
//! # Usage
//!
//! ```bash
//! cl-cli seed
//! ```
//!
//! Seeding is idempotent-ish: products are only inserted into an empty
//! catalog, and promo codes upsert by code.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use super::{CommandError, database_url};

struct SeedProduct {
    name: &'static str,
    price: &'static str,
    category: &'static str,
    stock: i32,
    discount: &'static str,
    featured: bool,
    features: &'static [&'static str],
    shipping_cost: &'static str,
}

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Silk Wrap Dress",
        price: "189.00",
        category: "dresses",
        stock: 12,
        discount: "0",
        featured: true,
        features: &["100% mulberry silk", "Adjustable wrap tie", "Fully lined"],
        shipping_cost: "0",
    },
    SeedProduct {
        name: "Linen Wide-Leg Trousers",
        price: "95.00",
        category: "trousers",
        stock: 30,
        discount: "10",
        featured: false,
        features: &["European flax linen", "High waist", "Side pockets"],
        shipping_cost: "0",
    },
    SeedProduct {
        name: "Merino Cropped Cardigan",
        price: "120.00",
        category: "knitwear",
        stock: 8,
        discount: "0",
        featured: true,
        features: &[
            "Extra-fine merino wool",
            "Shell buttons",
            "Cropped fit",
            "Machine washable",
        ],
        shipping_cost: "5.00",
    },
];

/// Insert sample products and promo codes.
///
/// # Errors
///
/// Returns an error if the environment is missing the database URL or a
/// query fails.
pub async fn run() -> Result<(), CommandError> {
    dotenvy::dotenv().ok();

    let pool = PgPool::connect(&database_url()?).await?;

    let (product_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
        .fetch_one(&pool)
        .await?;

    if product_count == 0 {
        for product in PRODUCTS {
            let price: Decimal = product.price.parse().unwrap_or_default();
            let discount: Decimal = product.discount.parse().unwrap_or_default();
            let shipping_cost: Decimal = product.shipping_cost.parse().unwrap_or_default();
            let features: Vec<String> =
                product.features.iter().map(ToString::to_string).collect();

            sqlx::query(
                r"
                INSERT INTO products
                    (name, price, category, stock, discount, featured, features, shipping_cost)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ",
            )
            .bind(product.name)
            .bind(price)
            .bind(product.category)
            .bind(product.stock)
            .bind(discount)
            .bind(product.featured)
            .bind(&features)
            .bind(shipping_cost)
            .execute(&pool)
            .await?;
        }
        info!(count = PRODUCTS.len(), "Seeded products");
    } else {
        info!(count = product_count, "Catalog not empty, skipping product seed");
    }

    // SAVE10: 10% off orders of 100 or more
    sqlx::query(
        r"
        INSERT INTO promo_codes (code, discount, kind, min_order, description)
        VALUES ('SAVE10', 10, 'percent', 100, '10% off orders of 100 or more')
        ON CONFLICT (code) DO NOTHING
        ",
    )
    .execute(&pool)
    .await?;

    // WELCOME15: 15 off, first 200 redemptions
    sqlx::query(
        r"
        INSERT INTO promo_codes (code, discount, kind, min_order, usage_limit, description)
        VALUES ('WELCOME15', 15, 'fixed', 50, 200, '15 off your first order over 50')
        ON CONFLICT (code) DO NOTHING
        ",
    )
    .execute(&pool)
    .await?;

    info!("Seeded promo codes");
    Ok(())
}
