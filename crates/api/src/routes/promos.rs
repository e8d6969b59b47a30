//! Promo code route handlers.
//!
//! Validation is public (the checkout page calls it); everything else is
//! admin CRUD.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use serde_json::json;
use tracing::instrument;

use copper_lily_core::PromoCodeId;

use crate::db::PromoRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::promo::{PromoCode, PromoInput, ValidatePromoRequest};
use crate::routes::check;
use crate::state::AppState;

/// `POST /api/promocodes/validate` - run the redemption checks against a
/// candidate order total.
///
/// Pure read: `usedCount` only advances when an order is actually placed.
#[instrument(skip(state, request), fields(code = %request.code))]
pub async fn validate(
    State(state): State<AppState>,
    Json(request): Json<ValidatePromoRequest>,
) -> Result<Json<PromoCode>> {
    let promo = PromoRepository::new(state.pool())
        .get_by_code(&request.code)
        .await?
        .ok_or_else(|| AppError::NotFound("Promo code not found".to_string()))?;

    promo.check_redeemable(request.order_total, Utc::now())?;
    Ok(Json(promo))
}

/// `GET /api/promocodes` (admin) - list all codes.
#[instrument(skip(_admin, state))]
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<PromoCode>>> {
    let promos = PromoRepository::new(state.pool()).list().await?;
    Ok(Json(promos))
}

/// `POST /api/promocodes` (admin) - create a code.
#[instrument(skip(_admin, state, input))]
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<PromoInput>,
) -> Result<(StatusCode, Json<PromoCode>)> {
    check(&input)?;
    let promo = PromoRepository::new(state.pool()).create(&input).await?;
    tracing::info!(promo_id = %promo.id, code = %promo.code, "Promo code created");
    Ok((StatusCode::CREATED, Json(promo)))
}

/// `PUT /api/promocodes/{id}` (admin) - update a code.
#[instrument(skip(_admin, state, input))]
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<PromoCodeId>,
    Json(input): Json<PromoInput>,
) -> Result<Json<PromoCode>> {
    check(&input)?;
    let promo = PromoRepository::new(state.pool())
        .update(id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound("Promo code not found".to_string()))?;
    Ok(Json(promo))
}

/// `DELETE /api/promocodes/{id}` (admin).
#[instrument(skip(_admin, state))]
pub async fn destroy(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<PromoCodeId>,
) -> Result<Json<serde_json::Value>> {
    let deleted = PromoRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Promo code not found".to_string()));
    }
    Ok(Json(json!({ "message": "Promo code deleted" })))
}
