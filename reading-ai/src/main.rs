//! reading-ai - AI reading assistant service
//!
//! Serves book analysis and flashcard generation backed by Gemini.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use reading_ai::config::{resolve_api_key, resolve_bind, resolve_model, BIND_ENV_VAR};
use reading_ai::gemini::GeminiClient;
use reading_ai::{build_router, AppState};
use reading_common::config::{TomlConfig, CONFIG_ENV_VAR};
use tracing::{error, info};

/// Command-line arguments for reading-ai
#[derive(Parser, Debug)]
#[command(name = "reading-ai")]
#[command(about = "AI reading assistant service")]
#[command(version)]
struct Args {
    /// Config file (TOML)
    #[arg(short, long, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long, env = BIND_ENV_VAR)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let toml = TomlConfig::load(args.config.as_deref());

    reading_common::logging::init(&toml.logging.level);

    info!(
        "Starting reading-ai (AI reading assistant) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let api_key = match resolve_api_key(&toml) {
        Ok(key) => key,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    let client = GeminiClient::new(api_key, resolve_model(&toml))
        .context("Failed to build Gemini client")?;
    info!("Gemini model: {}", client.model());

    let state = AppState::new(Arc::new(client));
    let app = build_router(state);

    let bind = resolve_bind(args.bind.as_deref(), &toml);
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!("reading-ai listening on http://{}", bind);
    info!("Health check: http://{}/health", bind);

    axum::serve(listener, app).await?;

    Ok(())
}
