//! CLI administration tool for shortlink.
//!
//! Provides commands for inspecting stored links and performing storage
//! operations without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List every link with its hit count
//! cargo run --bin admin -- links
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check storage connection
//! cargo run --bin admin -- db check
//!
//! # Apply PostgreSQL migrations
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): storage connection string, read exactly as
//!   the server reads it

use shortlink::config::{self, Config, mask_connection_string};
use shortlink::domain::entities::ShortLink;
use shortlink::domain::repositories::LinkRepository;
use shortlink::infrastructure::persistence::{StorageBackend, connect_storage};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;

/// CLI tool for managing shortlink.
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
    /// List all links with hit counts
    Links,

    /// Show statistics
    Stats,

    /// Storage operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Storage operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check storage connection
    Check,

    /// Apply pending migrations (PostgreSQL only)
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;

    match cli.command {
        Commands::Links => list_links(&connect(&config, false).await?).await?,
        Commands::Stats => handle_stats(&connect(&config, false).await?).await?,
        Commands::Db { action } => handle_db_action(action, &config).await?,
    }

    Ok(())
}

async fn connect(config: &Config, run_migrations: bool) -> Result<Arc<dyn LinkRepository>> {
    connect_storage(
        &config.database_url,
        &config.pool_settings(),
        run_migrations,
    )
    .await
    .with_context(|| {
        format!(
            "Failed to connect to {}",
            mask_connection_string(&config.database_url)
        )
    })
}

async fn fetch_links(repo: &Arc<dyn LinkRepository>) -> Result<Vec<ShortLink>> {
    repo.list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))
}

/// Lists every stored link ordered by code.
///
/// # Output Format
///
/// ```text
/// 🔗 Links
///
///   Code       Hits       URL
///   ──────────────────────────────────────────────────────────
///   aZ3k9Q     12         https://example.com/some/long/path
///
///   Total: 1 links, 12 hits
/// ```
async fn list_links(repo: &Arc<dyn LinkRepository>) -> Result<()> {
    println!("{}", "🔗 Links".bright_blue().bold());
    println!();

    let links = fetch_links(repo).await?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<10} {:<10} {}",
        "Code".bright_white().bold(),
        "Hits".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<10} {:<10} {}",
            link.code.cyan(),
            link.hits.to_string().bright_black(),
            link.original_url
        );
    }

    let total_hits: u64 = links.iter().map(|l| l.hits).sum();

    println!();
    println!(
        "  Total: {} links, {} hits",
        links.len().to_string().bright_white().bold(),
        total_hits.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Displays link count and total hits.
async fn handle_stats(repo: &Arc<dyn LinkRepository>) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links = fetch_links(repo).await?;
    let total_hits: u64 = links.iter().map(|l| l.hits).sum();

    println!("  Backend: {}", repo.backend_name().bright_white());
    println!(
        "  Links:   {}",
        links.len().to_string().bright_green().bold()
    );
    println!(
        "  Hits:    {}",
        total_hits.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles storage diagnostic commands.
async fn handle_db_action(action: DbAction, config: &Config) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking storage connection...".bright_blue());

            let repo = connect(config, false).await?;
            if !repo.health_check().await {
                anyhow::bail!("{} storage did not answer the health check", repo.backend_name());
            }

            println!(
                "{}",
                format!("✅ {} storage connection OK", repo.backend_name())
                    .green()
                    .bold()
            );
        }
        DbAction::Migrate => {
            if config.storage_backend() != Some(StorageBackend::Postgres) {
                println!(
                    "{}",
                    "⚠️  Migrations only apply to PostgreSQL storage; nothing to do".yellow()
                );
                return Ok(());
            }

            println!("{}", "🛠  Applying migrations...".bright_blue());

            connect(config, true).await?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}
