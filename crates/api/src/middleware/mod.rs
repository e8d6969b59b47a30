//! Request middleware: the auth gate extractors and request-id tracing.

pub mod auth;
pub mod request_id;

pub use auth::{OptionalUser, RequireAdmin, RequireUser};
