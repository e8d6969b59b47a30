//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! # Catalog
//! GET    /api/products                 - List (filter: ?category=&featured=)
//! GET    /api/products/{id}            - Product detail
//! POST   /api/products                 - Create (admin)
//! PUT    /api/products/{id}            - Update (admin)
//! DELETE /api/products/{id}            - Delete (admin)
//!
//! # Cart (owner or admin)
//! GET    /api/cart/{userId}            - Fetch (empty cart if none)
//! POST   /api/cart/{userId}            - Full replacement save
//! DELETE /api/cart/{userId}            - Clear
//!
//! # Orders
//! GET    /api/orders                   - List all (admin)
//! GET    /api/orders/user/{userId}     - List a user's orders (owner or admin)
//! POST   /api/orders                   - Checkout (guest allowed)
//! PUT    /api/orders/{id}/status       - Update status (admin)
//!
//! # Promo codes
//! POST   /api/promocodes/validate      - Validate a code against an order total
//! GET    /api/promocodes               - List (admin)
//! POST   /api/promocodes               - Create (admin)
//! PUT    /api/promocodes/{id}          - Update (admin)
//! DELETE /api/promocodes/{id}          - Delete (admin)
//!
//! # Admin
//! GET    /api/admin/analytics          - Summary (?range=week|month|year)
//! POST   /api/upload                   - Image upload (admin, multipart)
//! ```

pub mod admin;
pub mod cart;
pub mod orders;
pub mod products;
pub mod promos;
pub mod upload;

use axum::{
    Router,
    routing::{get, post, put},
};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use copper_lily_core::UserId;

use crate::error::AppError;
use crate::services::auth::AuthContext;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new().route(
        "/{user_id}",
        get(cart::show).post(cart::save).delete(cart::clear),
    )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/user/{user_id}", get(orders::user_orders))
        .route("/{id}/status", put(orders::update_status))
}

/// Create the promo code routes router.
pub fn promo_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(promos::index).post(promos::create))
        .route("/validate", post(promos::validate))
        .route("/{id}", put(promos::update).delete(promos::destroy))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/analytics", get(admin::analytics))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/promocodes", promo_routes())
        .nest("/api/admin", admin_routes())
        .route("/api/upload", post(upload::upload))
}

/// Validate a request DTO at the boundary, mapping the first failure into a
/// client-visible message.
pub(crate) fn check(input: &impl Validate) -> Result<(), AppError> {
    input
        .validate()
        .map_err(|errors| AppError::Validation(first_message(&errors)))
}

/// Pull one human-readable message out of a validator error tree.
fn first_message(errors: &ValidationErrors) -> String {
    for kind in errors.errors().values() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                if let Some(error) = field_errors.first() {
                    return error
                        .message
                        .as_ref()
                        .map_or_else(|| error.code.to_string(), ToString::to_string);
                }
            }
            ValidationErrorsKind::Struct(nested) => return first_message(nested),
            ValidationErrorsKind::List(list) => {
                if let Some(nested) = list.values().next() {
                    return first_message(nested);
                }
            }
        }
    }
    "Invalid request".to_string()
}

/// Order and cart reads are scoped to their owner; admins can read anyone's.
pub(crate) fn ensure_owner_or_admin(ctx: &AuthContext, owner: UserId) -> Result<(), AppError> {
    if ctx.role.is_admin() || ctx.user_id == owner {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You do not have access to this resource".to_string(),
        ))
    }
}
