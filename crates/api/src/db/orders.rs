//! Order repository and the checkout workflow.
//!
//! Checkout is the one place in the system with a cross-entity invariant:
//! an order must only exist alongside the stock it reserved. The whole
//! sequence - replay check, price reconciliation, promo redemption, order
//! insert, per-item stock decrement - runs inside a single transaction, so a
//! failure at any step leaves no partial state behind.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use thiserror::Error;
use uuid::Uuid;

use copper_lily_core::{OrderId, OrderStatus, ProductId, UserId, effective_unit_price};

use super::RepositoryError;
use crate::error::AppError;
use crate::models::order::{CheckoutRequest, ContactInfo, Order, OrderItem, compute_totals};
use crate::models::promo::{PromoRejection, check_redemption};

/// Why a checkout submission was refused.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A line item references a product that doesn't exist.
    #[error("Product {0} not found")]
    ProductNotFound(ProductId),

    /// The client's unit price disagrees with the live catalog.
    #[error("Price for product {product_id} has changed (current price is {expected})")]
    PriceMismatch {
        product_id: ProductId,
        expected: Decimal,
    },

    /// The client's total disagrees with the server-side recomputation.
    #[error("Order total does not match (expected {expected})")]
    TotalMismatch { expected: Decimal },

    /// A floor-checked stock decrement found too few units.
    #[error("Insufficient stock for product {0}")]
    InsufficientStock(ProductId),

    /// The submitted promo code doesn't exist.
    #[error("Promo code not found")]
    PromoNotFound,

    /// The promo code exists but cannot be redeemed.
    #[error(transparent)]
    Promo(#[from] PromoRejection),

    /// Underlying storage failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

impl From<CheckoutError> for AppError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::ProductNotFound(_) => Self::NotFound("Product not found".to_string()),
            CheckoutError::PromoNotFound => Self::NotFound("Promo code not found".to_string()),
            CheckoutError::InsufficientStock(_) => Self::Conflict(e.to_string()),
            CheckoutError::PriceMismatch { .. }
            | CheckoutError::TotalMismatch { .. }
            | CheckoutError::Promo(_) => Self::BadRequest(e.to_string()),
            CheckoutError::Repository(err) => Self::Database(err),
        }
    }
}

/// Internal row type for order queries (items are loaded separately).
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct OrderRow {
    pub id: i32,
    pub user_id: Option<i32>,
    pub total: Decimal,
    pub status: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, RepositoryError> {
        let status = OrderStatus::from_str(&self.status)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid order status: {e}")))?;

        Ok(Order {
            id: OrderId::new(self.id),
            user_id: self.user_id.map(UserId::new),
            items,
            total: self.total,
            status,
            contact: ContactInfo {
                first_name: self.first_name,
                last_name: self.last_name,
                email: self.email,
                phone: self.phone,
                address: self.address,
                city: self.city,
                country: self.country,
                postal_code: self.postal_code,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Internal row type for order item queries.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct OrderItemRow {
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub price: Decimal,
}

/// Internal row type for the product fields checkout needs.
#[derive(Debug, sqlx::FromRow)]
struct CheckoutProductRow {
    id: i32,
    price: Decimal,
    discount: Decimal,
}

/// Internal row type for promo fields checkout needs.
#[derive(Debug, sqlx::FromRow)]
struct CheckoutPromoRow {
    id: i32,
    discount: Decimal,
    kind: String,
    min_order: Decimal,
    expiry: Option<DateTime<Utc>>,
    usage_limit: Option<i32>,
    used_count: i32,
}

const ORDER_COLUMNS: &str = "id, user_id, total, status, first_name, last_name, email, phone, \
                             address, city, country, postal_code, created_at, updated_at";

/// Repository for order database operations and the checkout workflow.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Run the checkout workflow.
    ///
    /// Returns the persisted order and whether it was a replay of an earlier
    /// submission with the same idempotency key (replays re-apply nothing).
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] naming the first failed step; the
    /// transaction rolls back, so a rejected checkout writes nothing.
    pub async fn create(
        &self,
        user_id: Option<UserId>,
        request: &CheckoutRequest,
    ) -> Result<(Order, bool), CheckoutError> {
        let mut tx = self.pool.begin().await?;

        // Replay: a retried submission returns the original order untouched.
        if let Some(existing) =
            find_by_idempotency_key(&mut *tx, request.idempotency_key).await?
        {
            tx.commit().await?;
            return Ok((existing, true));
        }

        // Lock each product row and reconcile the client's unit prices with
        // the live catalog.
        let mut lines: Vec<(Decimal, i32)> = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let row = sqlx::query_as::<_, CheckoutProductRow>(
                "SELECT id, price, discount FROM products WHERE id = $1 FOR UPDATE",
            )
            .bind(item.product_id.as_i32())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CheckoutError::ProductNotFound(item.product_id))?;

            let expected = effective_unit_price(row.price, row.discount);
            if item.price != expected {
                return Err(CheckoutError::PriceMismatch {
                    product_id: ProductId::new(row.id),
                    expected,
                });
            }
            lines.push((expected, item.quantity));
        }

        // Redeem the promo code, if any: re-run the validation checks against
        // the recomputed subtotal, then advance used_count gated by the same
        // usage-limit predicate.
        let subtotal = compute_totals(&lines, None, Decimal::ZERO).subtotal;
        let promo = match &request.promo_code {
            Some(code) => Some(redeem_promo(&mut *tx, code, subtotal).await?),
            None => None,
        };

        let totals = compute_totals(&lines, promo, request.shipping_method.cost());
        if request.total != totals.total {
            return Err(CheckoutError::TotalMismatch {
                expected: totals.total,
            });
        }

        // Persist the order with the reconciled total.
        let order_row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            INSERT INTO orders
                (user_id, idempotency_key, total, status, first_name, last_name,
                 email, phone, address, city, country, postal_code)
            VALUES ($1, $2, $3, 'pending', $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(user_id.map(|id| id.as_i32()))
        .bind(request.idempotency_key)
        .bind(totals.total)
        .bind(&request.contact.first_name)
        .bind(&request.contact.last_name)
        .bind(&request.contact.email)
        .bind(&request.contact.phone)
        .bind(&request.contact.address)
        .bind(&request.contact.city)
        .bind(&request.contact.country)
        .bind(&request.contact.postal_code)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                // Lost the idempotency race to a concurrent retry; the
                // caller re-reads the winner below.
                return CheckoutError::Repository(RepositoryError::Conflict(
                    "duplicate idempotency key".to_owned(),
                ));
            }
            CheckoutError::from(e)
        });

        let order_row = match order_row {
            Ok(row) => row,
            Err(CheckoutError::Repository(RepositoryError::Conflict(_))) => {
                // Abandon this transaction and return the concurrent winner.
                drop(tx);
                let existing = self
                    .find_by_idempotency_key(request.idempotency_key)
                    .await?
                    .ok_or(CheckoutError::Repository(RepositoryError::NotFound))?;
                return Ok((existing, true));
            }
            Err(e) => return Err(e),
        };

        let mut items = Vec::with_capacity(request.items.len());
        for (item, (price, _)) in request.items.iter().zip(&lines) {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(order_row.id)
            .bind(item.product_id.as_i32())
            .bind(item.quantity)
            .bind(price)
            .execute(&mut *tx)
            .await?;

            items.push(OrderItem {
                product_id: item.product_id,
                quantity: item.quantity,
                price: *price,
            });

            // Floor-checked decrement: zero rows means too few units, which
            // rolls back the order insert and every prior decrement.
            let result = sqlx::query(
                r"
                UPDATE products
                SET stock = stock - $2, updated_at = NOW()
                WHERE id = $1 AND stock >= $2
                ",
            )
            .bind(item.product_id.as_i32())
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(CheckoutError::InsufficientStock(item.product_id));
            }
        }

        tx.commit().await?;

        let order = order_row.into_order(items)?;
        Ok((order, false))
    }

    /// List all orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        self.assemble(rows).await
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        self.assemble(rows).await
    }

    /// Look up an order by the idempotency key of its checkout submission.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_idempotency_key(
        &self,
        key: Uuid,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        find_by_idempotency_key(&mut *conn, key).await
    }

    /// Update an order's status. Returns `None` if the order doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            UPDATE orders
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(id.as_i32())
        .bind(status.to_string())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = load_items(self.pool, &[row.id]).await?;
                let order = row.into_order(items.into_values().flatten().collect())?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    /// Attach item lists to a batch of order rows.
    async fn assemble(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let mut items_by_order = load_items(self.pool, &ids).await?;

        rows.into_iter()
            .map(|row| {
                let items = items_by_order.remove(&row.id).unwrap_or_default();
                row.into_order(items)
            })
            .collect()
    }
}

/// Load items for a set of orders in one query, grouped by order.
async fn load_items(
    pool: &PgPool,
    order_ids: &[i32],
) -> Result<HashMap<i32, Vec<OrderItem>>, RepositoryError> {
    if order_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, OrderItemRow>(
        r"
        SELECT order_id, product_id, quantity, price
        FROM order_items
        WHERE order_id = ANY($1)
        ORDER BY id ASC
        ",
    )
    .bind(order_ids)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<i32, Vec<OrderItem>> = HashMap::new();
    for row in rows {
        grouped.entry(row.order_id).or_default().push(OrderItem {
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            price: row.price,
        });
    }
    Ok(grouped)
}

/// Fetch an order (with items) by idempotency key on any connection.
async fn find_by_idempotency_key(
    conn: &mut PgConnection,
    key: Uuid,
) -> Result<Option<Order>, RepositoryError> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE idempotency_key = $1"
    ))
    .bind(key)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let items = sqlx::query_as::<_, OrderItemRow>(
        r"
        SELECT order_id, product_id, quantity, price
        FROM order_items
        WHERE order_id = $1
        ORDER BY id ASC
        ",
    )
    .bind(row.id)
    .fetch_all(&mut *conn)
    .await?;

    let items = items
        .into_iter()
        .map(|r| OrderItem {
            product_id: ProductId::new(r.product_id),
            quantity: r.quantity,
            price: r.price,
        })
        .collect();

    Ok(Some(row.into_order(items)?))
}

/// Validate and redeem a promo code inside the checkout transaction.
///
/// Locks the promo row, re-runs the redemption checks against the recomputed
/// subtotal, then advances `used_count` gated by the usage-limit predicate.
/// Returns the (kind, magnitude) pair for the total computation.
async fn redeem_promo(
    tx: &mut PgConnection,
    code: &str,
    subtotal: Decimal,
) -> Result<(copper_lily_core::PromoKind, Decimal), CheckoutError> {
    use copper_lily_core::PromoKind;

    let row = sqlx::query_as::<_, CheckoutPromoRow>(
        r"
        SELECT id, discount, kind, min_order, expiry, usage_limit, used_count
        FROM promo_codes
        WHERE code = $1
        FOR UPDATE
        ",
    )
    .bind(code)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(CheckoutError::PromoNotFound)?;

    let kind = PromoKind::from_str(&row.kind).map_err(|e| {
        CheckoutError::Repository(RepositoryError::DataCorruption(format!(
            "invalid promo kind: {e}"
        )))
    })?;

    check_redemption(
        row.expiry,
        row.usage_limit,
        row.used_count,
        row.min_order,
        subtotal,
        Utc::now(),
    )?;

    let result = sqlx::query(
        r"
        UPDATE promo_codes
        SET used_count = used_count + 1, updated_at = NOW()
        WHERE id = $1
          AND (usage_limit IS NULL OR used_count < usage_limit)
        ",
    )
    .bind(row.id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(PromoRejection::UsageLimitReached.into());
    }

    Ok((kind, row.discount))
}
