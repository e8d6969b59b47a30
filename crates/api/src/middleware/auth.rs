//! Auth gate extractors.
//!
//! Route handlers consume the auth gate through these extractors: a bearer
//! credential in the `Authorization` header is verified against the token
//! service and becomes an [`AuthContext`]. Admin and order/cart endpoints
//! take the extractor they need; guest-friendly endpoints use
//! [`OptionalUser`].

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::services::auth::{AuthContext, AuthError};
use crate::state::AppState;

/// Extractor that requires an authenticated caller (any role).
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireUser(ctx): RequireUser) -> impl IntoResponse {
///     format!("user {}", ctx.user_id)
/// }
/// ```
pub struct RequireUser(pub AuthContext);

/// Extractor that requires an authenticated admin.
pub struct RequireAdmin(pub AuthContext);

/// Extractor that optionally reads the caller's identity.
///
/// Unlike [`RequireUser`], this never rejects the request: a missing or
/// unverifiable credential yields `None` (guest).
pub struct OptionalUser(pub Option<AuthContext>);

/// Rejection for the auth extractors.
pub enum AuthRejection {
    /// No `Authorization: Bearer` header on the request.
    MissingCredential,
    /// The credential failed verification.
    Invalid(AuthError),
    /// Verified, but the role doesn't grant access.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingCredential => (StatusCode::UNAUTHORIZED, "Authentication required"),
            Self::Invalid(err) => (StatusCode::UNAUTHORIZED, err.client_message()),
            Self::Forbidden => (StatusCode::FORBIDDEN, "Admin access required"),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Pull the bearer token out of the `Authorization` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthRejection::MissingCredential)?;
        let ctx = state.auth().verify(token).map_err(AuthRejection::Invalid)?;
        Ok(Self(ctx))
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireUser(ctx) = RequireUser::from_request_parts(parts, state).await?;
        if !ctx.role.is_admin() {
            return Err(AuthRejection::Forbidden);
        }
        Ok(Self(ctx))
    }
}

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = bearer_token(parts).and_then(|token| state.auth().verify(token).ok());
        Ok(Self(ctx))
    }
}
