//! Order route handlers.
//!
//! Checkout is open to guests; every read is scoped to the owner or an
//! admin. The workflow itself lives in [`crate::db::orders`].

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use copper_lily_core::{OrderId, UserId};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::{OptionalUser, RequireAdmin, RequireUser};
use crate::models::order::{CheckoutRequest, Order, UpdateStatusRequest};
use crate::routes::{check, ensure_owner_or_admin};
use crate::state::AppState;

/// `GET /api/orders` (admin) - list every order.
#[instrument(skip(_admin, state))]
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;
    Ok(Json(orders))
}

/// `GET /api/orders/user/{userId}` - list a user's orders.
#[instrument(skip(ctx, state))]
pub async fn user_orders(
    RequireUser(ctx): RequireUser,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<Order>>> {
    ensure_owner_or_admin(&ctx, user_id)?;

    let orders = OrderRepository::new(state.pool())
        .list_for_user(user_id)
        .await?;
    Ok(Json(orders))
}

/// `POST /api/orders` - the checkout submission.
///
/// Guest checkout is allowed: the order's owner comes from the bearer
/// credential when one is present and is never taken from the payload.
/// Replayed idempotency keys return the original order with `200` instead
/// of `201`.
#[instrument(skip(user, state, request))]
pub async fn create(
    OptionalUser(user): OptionalUser,
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    check(&request)?;
    for item in &request.items {
        check(item)?;
    }

    let user_id = user.map(|ctx| ctx.user_id);
    let (order, replayed) = OrderRepository::new(state.pool())
        .create(user_id, &request)
        .await?;

    if replayed {
        tracing::info!(order_id = %order.id, "Checkout replayed via idempotency key");
        Ok((StatusCode::OK, Json(order)))
    } else {
        tracing::info!(
            order_id = %order.id,
            total = %order.total,
            items = order.items.len(),
            "Order created"
        );
        Ok((StatusCode::CREATED, Json(order)))
    }
}

/// `PUT /api/orders/{id}/status` (admin) - move an order through its
/// lifecycle.
#[instrument(skip(_admin, state))]
pub async fn update_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .update_status(id, request.status)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    tracing::info!(order_id = %order.id, status = %order.status, "Order status updated");
    Ok(Json(order))
}
