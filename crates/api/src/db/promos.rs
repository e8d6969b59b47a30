//! Promo code repository.
//!
//! Reads are used by the public validation endpoint; writes are admin-only.
//! `used_count` is only ever advanced by the order workflow (see
//! [`super::orders`]), never through this repository.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use copper_lily_core::{PromoCodeId, PromoKind};

use super::RepositoryError;
use crate::models::promo::{PromoCode, PromoInput};

/// Internal row type for promo code queries.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PromoRow {
    pub id: i32,
    pub code: String,
    pub discount: Decimal,
    pub kind: String,
    pub min_order: Decimal,
    pub expiry: Option<DateTime<Utc>>,
    pub usage_limit: Option<i32>,
    pub used_count: i32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PromoRow> for PromoCode {
    type Error = RepositoryError;

    fn try_from(row: PromoRow) -> Result<Self, Self::Error> {
        let kind = PromoKind::from_str(&row.kind)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid promo kind: {e}")))?;

        Ok(Self {
            id: PromoCodeId::new(row.id),
            code: row.code,
            discount: row.discount,
            kind,
            min_order: row.min_order,
            expiry: row.expiry,
            usage_limit: row.usage_limit,
            used_count: row.used_count,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for promo code database operations.
pub struct PromoRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PromoRepository<'a> {
    /// Create a new promo repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all promo codes, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored kind is invalid.
    pub async fn list(&self) -> Result<Vec<PromoCode>, RepositoryError> {
        let rows = sqlx::query_as::<_, PromoRow>(
            r"
            SELECT id, code, discount, kind, min_order, expiry, usage_limit,
                   used_count, description, created_at, updated_at
            FROM promo_codes
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(PromoCode::try_from).collect()
    }

    /// Look up a promo code by exact, case-sensitive code string.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_code(&self, code: &str) -> Result<Option<PromoCode>, RepositoryError> {
        let row = sqlx::query_as::<_, PromoRow>(
            r"
            SELECT id, code, discount, kind, min_order, expiry, usage_limit,
                   used_count, description, created_at, updated_at
            FROM promo_codes
            WHERE code = $1
            ",
        )
        .bind(code)
        .fetch_optional(self.pool)
        .await?;

        row.map(PromoCode::try_from).transpose()
    }

    /// Create a promo code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the code already exists, or
    /// `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &PromoInput) -> Result<PromoCode, RepositoryError> {
        let row = sqlx::query_as::<_, PromoRow>(
            r"
            INSERT INTO promo_codes
                (code, discount, kind, min_order, expiry, usage_limit, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, code, discount, kind, min_order, expiry, usage_limit,
                      used_count, description, created_at, updated_at
            ",
        )
        .bind(&input.code)
        .bind(input.discount)
        .bind(input.kind.to_string())
        .bind(input.min_order)
        .bind(input.expiry)
        .bind(input.usage_limit)
        .bind(&input.description)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("Promo code already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        PromoCode::try_from(row)
    }

    /// Update a promo code. Returns `None` if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the new code collides with an
    /// existing one, or `RepositoryError::Database` for other errors.
    pub async fn update(
        &self,
        id: PromoCodeId,
        input: &PromoInput,
    ) -> Result<Option<PromoCode>, RepositoryError> {
        let row = sqlx::query_as::<_, PromoRow>(
            r"
            UPDATE promo_codes
            SET code = $2, discount = $3, kind = $4, min_order = $5,
                expiry = $6, usage_limit = $7, description = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, code, discount, kind, min_order, expiry, usage_limit,
                      used_count, description, created_at, updated_at
            ",
        )
        .bind(id.as_i32())
        .bind(&input.code)
        .bind(input.discount)
        .bind(input.kind.to_string())
        .bind(input.min_order)
        .bind(input.expiry)
        .bind(input.usage_limit)
        .bind(&input.description)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("Promo code already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.map(PromoCode::try_from).transpose()
    }

    /// Delete a promo code.
    ///
    /// # Returns
    ///
    /// `true` if the code was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: PromoCodeId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM promo_codes WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
