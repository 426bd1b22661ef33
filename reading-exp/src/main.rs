//! reading-exp - Experiences service
//!
//! Serves the experiences HTTP API over a local SQLite store.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use reading_common::config::{resolve_database_path, TomlConfig, CONFIG_ENV_VAR};
use reading_exp::config::{resolve_bind, resolve_token_policy, BIND_ENV_VAR};
use reading_exp::{build_router, db, AppState};
use tracing::info;

/// Command-line arguments for reading-exp
#[derive(Parser, Debug)]
#[command(name = "reading-exp")]
#[command(about = "Experiences service for reading topics")]
#[command(version)]
struct Args {
    /// Config file (TOML)
    #[arg(short, long, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long, env = BIND_ENV_VAR)]
    bind: Option<String>,

    /// SQLite database file
    #[arg(short, long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let toml = TomlConfig::load(args.config.as_deref());

    reading_common::logging::init(&toml.logging.level);

    info!(
        "Starting reading-exp (experiences service) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let db_path = resolve_database_path(args.database.as_deref(), &toml);
    info!("Database path: {}", db_path.display());

    let pool = db::init_database_pool(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    info!("✓ Database ready");

    let state = AppState::new(pool, resolve_token_policy(&toml));
    let app = build_router(state);

    let bind = resolve_bind(args.bind.as_deref(), &toml);
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!("reading-exp listening on http://{}", bind);
    info!("Health check: http://{}/health", bind);

    axum::serve(listener, app).await?;

    Ok(())
}
