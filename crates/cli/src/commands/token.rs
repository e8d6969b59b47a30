//! Credential minting command.
//!
//! The auth gate itself (login, signup) lives outside this repository; for
//! operations and testing this command mints the same bearer credentials
//! the gate would issue.
//!
//! # Usage
//!
//! ```bash
//! cl-cli token --user-id 1 --role admin --ttl-days 30
//! ```
//!
//! # Environment Variables
//!
//! - `API_TOKEN_SECRET` - the signing secret the API verifies against

use std::str::FromStr;

use chrono::Duration;
use secrecy::SecretString;

use copper_lily_api::services::auth::TokenVerifier;
use copper_lily_core::{UserId, UserRole};

use super::CommandError;

/// Mint a bearer credential and print it to stdout.
///
/// # Errors
///
/// Returns an error if `API_TOKEN_SECRET` is unset or the role is invalid.
pub fn mint(user_id: i32, role: &str, ttl_days: i64) -> Result<(), CommandError> {
    dotenvy::dotenv().ok();

    let secret = std::env::var("API_TOKEN_SECRET")
        .map_err(|_| CommandError::MissingEnvVar("API_TOKEN_SECRET"))?;
    let role = UserRole::from_str(role).map_err(CommandError::InvalidArgument)?;

    let verifier = TokenVerifier::new(SecretString::from(secret));
    let token = verifier.issue(UserId::new(user_id), role, Duration::days(ttl_days));

    #[allow(clippy::print_stdout)]
    {
        println!("{token}");
    }
    Ok(())
}
