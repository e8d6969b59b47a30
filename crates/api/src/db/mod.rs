//! Database operations for the Copper Lily `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `products` - Catalog store (stock is mutated by the order workflow)
//! - `promo_codes` - Promo registry
//! - `carts` - Per-user cart snapshots (JSONB item lists)
//! - `orders` / `order_items` - Order workflow records
//! - `customers` - Peripheral address-book records (analytics only)
//!
//! All queries go through the runtime `query_as`/`query` API with internal
//! row types; repositories convert rows into the domain types in
//! [`crate::models`].
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p copper-lily-cli -- migrate
//! ```

pub mod analytics;
pub mod carts;
pub mod orders;
pub mod products;
pub mod promos;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use analytics::AnalyticsRepository;
pub use carts::CartRepository;
pub use orders::{CheckoutError, OrderRepository};
pub use products::ProductRepository;
pub use promos::PromoRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate promo code).
    #[error("{0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Create a pool without connecting, for tests that only exercise
/// request handling up to the first database call.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection string cannot be parsed.
pub fn create_lazy_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(2)
        .connect_lazy(database_url.expose_secret())
}
