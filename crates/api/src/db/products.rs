//! Product repository for catalog reads and admin writes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use copper_lily_core::ProductId;

use super::RepositoryError;
use crate::models::product::{Product, ProductFilter, ProductInput};

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    pub images: Vec<String>,
    pub description: Option<String>,
    pub category: String,
    pub stock: i32,
    pub discount: Decimal,
    pub featured: bool,
    pub features: Vec<String>,
    pub shipping_info: Option<String>,
    pub shipping_cost: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            price: row.price,
            images: row.images,
            description: row.description,
            category: row.category,
            stock: row.stock,
            discount: row.discount,
            featured: row.featured,
            features: row.features,
            shipping_info: row.shipping_info,
            shipping_cost: row.shipping_cost,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, optionally filtered by category and featured flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, price, images, description, category, stock,
                   discount, featured, features, shipping_info, shipping_cost,
                   created_at, updated_at
            FROM products
            WHERE ($1::text IS NULL OR category = $1)
              AND (NOT $2 OR featured)
            ORDER BY created_at DESC
            ",
        )
        .bind(filter.category.as_deref())
        .bind(filter.featured)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, price, images, description, category, stock,
                   discount, featured, features, shipping_info, shipping_cost,
                   created_at, updated_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Create a new product from a validated input.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO products
                (name, price, images, description, category, stock, discount,
                 featured, features, shipping_info, shipping_cost)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, name, price, images, description, category, stock,
                      discount, featured, features, shipping_info, shipping_cost,
                      created_at, updated_at
            ",
        )
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.images)
        .bind(&input.description)
        .bind(&input.category)
        .bind(input.stock)
        .bind(input.discount)
        .bind(input.featured)
        .bind(&input.features)
        .bind(&input.shipping_info)
        .bind(input.shipping_cost)
        .fetch_one(self.pool)
        .await?;

        Ok(Product::from(row))
    }

    /// Fully update a product. Returns `None` if the product doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE products
            SET name = $2, price = $3, images = $4, description = $5,
                category = $6, stock = $7, discount = $8, featured = $9,
                features = $10, shipping_info = $11, shipping_cost = $12,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, price, images, description, category, stock,
                      discount, featured, features, shipping_info, shipping_cost,
                      created_at, updated_at
            ",
        )
        .bind(id.as_i32())
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.images)
        .bind(&input.description)
        .bind(&input.category)
        .bind(input.stock)
        .bind(input.discount)
        .bind(input.featured)
        .bind(&input.features)
        .bind(&input.shipping_info)
        .bind(input.shipping_cost)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
