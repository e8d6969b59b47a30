//! Admin back-office route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::db::AnalyticsRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::analytics::{AnalyticsRange, AnalyticsSummary};
use crate::state::AppState;

/// Analytics query parameters.
#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub range: Option<String>,
}

/// `GET /api/admin/analytics` - aggregate figures over a trailing window.
///
/// `change` is always 0; the endpoint computes no period-over-period delta.
#[instrument(skip(_admin, state))]
pub async fn analytics(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsSummary>> {
    let range = AnalyticsRange::from_query(query.range.as_deref());
    let summary = AnalyticsRepository::new(state.pool()).summary(range).await?;
    Ok(Json(summary))
}
