//! Cart route handlers.
//!
//! Carts are read and written by their owner (or an admin). A missing cart
//! reads as an empty one, never as an error.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::instrument;

use copper_lily_core::UserId;

use crate::db::CartRepository;
use crate::error::Result;
use crate::middleware::RequireUser;
use crate::models::cart::{CartItem, CartSaveRequest};
use crate::routes::ensure_owner_or_admin;
use crate::state::AppState;

/// The shape returned for a user with no stored cart.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmptyCart {
    user_id: UserId,
    items: Vec<CartItem>,
}

/// `GET /api/cart/{userId}` - fetch the stored cart, or an empty one.
#[instrument(skip(ctx, state))]
pub async fn show(
    RequireUser(ctx): RequireUser,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Response> {
    ensure_owner_or_admin(&ctx, user_id)?;

    let cart = CartRepository::new(state.pool()).get(user_id).await?;
    Ok(match cart {
        Some(cart) => Json(cart).into_response(),
        None => Json(EmptyCart {
            user_id,
            items: Vec::new(),
        })
        .into_response(),
    })
}

/// `POST /api/cart/{userId}` - replace the whole item list.
#[instrument(skip(ctx, state, request))]
pub async fn save(
    RequireUser(ctx): RequireUser,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(request): Json<CartSaveRequest>,
) -> Result<Response> {
    ensure_owner_or_admin(&ctx, user_id)?;

    let cart = CartRepository::new(state.pool())
        .save(user_id, &request.items)
        .await?;
    Ok(Json(cart).into_response())
}

/// `DELETE /api/cart/{userId}` - clear the cart.
#[instrument(skip(ctx, state))]
pub async fn clear(
    RequireUser(ctx): RequireUser,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<serde_json::Value>> {
    ensure_owner_or_admin(&ctx, user_id)?;

    CartRepository::new(state.pool()).clear(user_id).await?;
    Ok(Json(json!({ "message": "Cart cleared" })))
}
