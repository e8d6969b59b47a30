//! Aggregate queries for the admin analytics summary.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::analytics::{AnalyticsRange, AnalyticsSummary, Metric};

/// Repository for the admin analytics aggregates.
pub struct AnalyticsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AnalyticsRepository<'a> {
    /// Create a new analytics repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Compute the summary over a trailing window.
    ///
    /// Revenue and order counts cover orders created in the window, the
    /// customer count covers customers created in the window, and the
    /// product count is the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn summary(
        &self,
        range: AnalyticsRange,
    ) -> Result<AnalyticsSummary, RepositoryError> {
        let start = range.start_from(Utc::now());

        let (revenue, orders): (Decimal, i64) = sqlx::query_as(
            r"
            SELECT COALESCE(SUM(total), 0), COUNT(*)
            FROM orders
            WHERE created_at >= $1
            ",
        )
        .bind(start)
        .fetch_one(self.pool)
        .await?;

        let (customers,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM customers WHERE created_at >= $1")
                .bind(start)
                .fetch_one(self.pool)
                .await?;

        let (products,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;

        Ok(AnalyticsSummary {
            revenue: Metric::new(revenue, range),
            orders: Metric::new(orders, range),
            customers: Metric::new(customers, range),
            products: Metric::new(products, range),
        })
    }
}
