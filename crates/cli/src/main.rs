//! Copper Lily CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! cl-cli migrate
//!
//! # Seed the catalog and promo registry with sample data
//! cl-cli seed
//!
//! # Mint a bearer credential for the auth gate
//! cl-cli token --user-id 1 --role admin --ttl-days 30
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed sample products and promo codes
//! - `token` - Mint a bearer credential

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cl-cli")]
#[command(author, version, about = "Copper Lily CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with sample data
    Seed,
    /// Mint a bearer credential for the auth gate
    Token {
        /// User ID the credential identifies
        #[arg(short, long)]
        user_id: i32,

        /// Credential role (`user`, `admin`)
        #[arg(short, long, default_value = "user")]
        role: String,

        /// Days until the credential expires
        #[arg(short, long, default_value_t = 30)]
        ttl_days: i64,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::Token {
            user_id,
            role,
            ttl_days,
        } => commands::token::mint(user_id, &role, ttl_days)?,
    }
    Ok(())
}
