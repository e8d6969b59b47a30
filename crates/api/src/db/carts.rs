//! Cart repository.
//!
//! One row per user; the item list lives in a JSONB column and is replaced
//! wholesale on every save. Last write wins - there is no merge and no
//! conflict detection between a user's concurrent sessions.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use copper_lily_core::{CartId, UserId};

use super::RepositoryError;
use crate::models::cart::{Cart, CartItem};

/// Internal row type for cart queries.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CartRow {
    pub id: i32,
    pub user_id: i32,
    pub items: Json<Vec<CartItem>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: CartId::new(row.id),
            user_id: UserId::new(row.user_id),
            items: row.items.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user's cart. `None` means the user has no stored cart, which
    /// callers surface as an empty cart, not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, user_id, items, created_at, updated_at
            FROM carts
            WHERE user_id = $1
            ",
        )
        .bind(user_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Cart::from))
    }

    /// Replace a user's cart with the given item list, creating the cart
    /// row if none exists. Always a full overwrite, never a per-item patch.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn save(
        &self,
        user_id: UserId,
        items: &[CartItem],
    ) -> Result<Cart, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            INSERT INTO carts (user_id, items)
            VALUES ($1, $2)
            ON CONFLICT (user_id)
            DO UPDATE SET items = EXCLUDED.items, updated_at = NOW()
            RETURNING id, user_id, items, created_at, updated_at
            ",
        )
        .bind(user_id.as_i32())
        .bind(Json(items))
        .fetch_one(self.pool)
        .await?;

        Ok(Cart::from(row))
    }

    /// Delete a user's cart.
    ///
    /// # Returns
    ///
    /// `true` if a cart row was deleted, `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear(&self, user_id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM carts WHERE user_id = $1")
            .bind(user_id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
