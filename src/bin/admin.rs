//! CLI administration tool for linkvault.
//!
//! Inspects stored snippets and short URLs and performs database checks
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show a snippet (ciphertext if encrypted)
//! cargo run --bin admin -- snippet show QwErTyUiOp
//!
//! # Decrypt a snippet; the passphrase is prompted for, never passed as an argument
//! cargo run --bin admin -- snippet show QwErTyUiOp --unlock
//!
//! # Resolve a short URL
//! cargo run --bin admin -- url resolve aBcDeFgH
//!
//! # View record counts
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATABASE_URL` (or `DB_*`), `KDF_ITERATIONS`.

use linkvault::application::services::{ShortenerService, SnippetService};
use linkvault::config::{self, Config, mask_connection_string};
use linkvault::crypto::{ContentCrypto, KeyDerivation};
use linkvault::domain::entities::Snippet;
use linkvault::domain::repositories::{SnippetRepository, UrlRepository};
use linkvault::infrastructure::cache::NullCache;
use linkvault::infrastructure::persistence::{PgSnippetRepository, PgUrlRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Password;
use sqlx::PgPool;
use std::num::NonZeroU32;
use std::sync::Arc;

/// CLI tool for managing linkvault.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect snippets
    Snippet {
        #[command(subcommand)]
        action: SnippetAction,
    },

    /// Inspect short URLs
    Url {
        #[command(subcommand)]
        action: UrlAction,
    },

    /// Show record counts
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Snippet subcommands.
#[derive(Subcommand)]
enum SnippetAction {
    /// Show a snippet by id
    Show {
        id: String,

        /// Prompt for the passphrase and decrypt
        #[arg(short, long)]
        unlock: bool,
    },
}

/// Short URL subcommands.
#[derive(Subcommand)]
enum UrlAction {
    /// Print the long URL behind a short id
    Resolve { short_id: String },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let database_url = config
        .database_url
        .clone()
        .context("The admin tool needs a database (DATABASE_URL or DB_*)")?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database {}",
                mask_connection_string(&database_url)
            )
        })?;
    let pool = Arc::new(pool);

    match cli.command {
        Commands::Snippet { action } => handle_snippet_action(action, &config, pool).await?,
        Commands::Url { action } => handle_url_action(action, pool).await?,
        Commands::Stats => handle_stats(pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn snippet_service(
    config: &Config,
    pool: Arc<PgPool>,
) -> Result<SnippetService<PgSnippetRepository>> {
    let iterations =
        NonZeroU32::new(config.kdf_iterations).context("KDF_ITERATIONS must be non-zero")?;

    Ok(SnippetService::new(
        Arc::new(PgSnippetRepository::new(pool)),
        Arc::new(NullCache::new()),
        ContentCrypto::new(KeyDerivation::new(iterations)),
        config.max_snippet_bytes,
    ))
}

fn shortener_service(pool: Arc<PgPool>) -> ShortenerService<PgUrlRepository> {
    ShortenerService::new(
        Arc::new(PgUrlRepository::new(pool)),
        Arc::new(NullCache::new()),
        Arc::new(NullCache::new()),
    )
}

/// Dispatches snippet commands.
async fn handle_snippet_action(
    action: SnippetAction,
    config: &Config,
    pool: Arc<PgPool>,
) -> Result<()> {
    let service = snippet_service(config, pool)?;

    match action {
        SnippetAction::Show { id, unlock } => show_snippet(&service, &id, unlock).await,
    }
}

/// Prints snippet metadata and content.
///
/// With `--unlock` the passphrase is read from the terminal without echo.
async fn show_snippet(
    service: &SnippetService<PgSnippetRepository>,
    id: &str,
    unlock: bool,
) -> Result<()> {
    let snippet: Snippet = service
        .get_snippet(id)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("{}", "📄 Snippet".bright_blue().bold());
    println!();
    println!("  ID:        {}", snippet.id.cyan());
    println!(
        "  Created:   {}",
        snippet
            .created_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .bright_black()
    );
    println!(
        "  Encrypted: {}",
        if snippet.is_encrypted() {
            "yes".yellow()
        } else {
            "no".green()
        }
    );
    println!();

    let passphrase = if unlock {
        if !snippet.is_encrypted() {
            println!("{}", "⚠️  Snippet is not encrypted, showing as stored".yellow());
            None
        } else {
            Some(Password::new().with_prompt("Passphrase").interact()?)
        }
    } else {
        None
    };

    let resolved = service
        .resolve(id, passphrase)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    if resolved.still_encrypted {
        println!("{}", "Ciphertext:".bright_white().bold());
    } else {
        println!("{}", "Content:".bright_white().bold());
    }
    println!("{}", resolved.content);
    println!();

    Ok(())
}

/// Dispatches short URL commands.
async fn handle_url_action(action: UrlAction, pool: Arc<PgPool>) -> Result<()> {
    let service = shortener_service(pool);

    match action {
        UrlAction::Resolve { short_id } => {
            let long_url = service
                .get_long_url(&short_id)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;

            println!("  {} → {}", short_id.cyan(), long_url.bright_white());
        }
    }

    Ok(())
}

/// Displays record counts.
async fn handle_stats(pool: Arc<PgPool>) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let snippets = PgSnippetRepository::new(pool.clone());
    let urls = PgUrlRepository::new(pool.clone());

    let snippet_count = snippets
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let url_count = urls.count().await.map_err(|e| anyhow::anyhow!("{}", e))?;

    let encrypted_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM snippets WHERE encrypted")
            .fetch_one(pool.as_ref())
            .await?;

    println!(
        "  Snippets:   {} ({} encrypted)",
        snippet_count.to_string().bright_green().bold(),
        encrypted_count.to_string().yellow()
    );
    println!(
        "  Short URLs: {}",
        url_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
