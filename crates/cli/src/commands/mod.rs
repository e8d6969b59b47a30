//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod token;

use thiserror::Error;

/// Shared error for commands that read the environment and hit the database.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Resolve the database URL from `API_DATABASE_URL` or `DATABASE_URL`.
pub(crate) fn database_url() -> Result<String, CommandError> {
    std::env::var("API_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("API_DATABASE_URL"))
}
