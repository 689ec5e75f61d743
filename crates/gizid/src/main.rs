//! gizid - Gizi Server Daemon
//!
//! REST API for child nutrition screening.
//!
//! Usage:
//!   gizid [OPTIONS] [config.toml]
//!
//! Without `--memory` a PostgreSQL `DATABASE_URL` is required.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use gizi_api::{create_router, AppState};
use gizi_core::{AnalysisStore, TokenResolver};
use gizi_predict::PredictorClient;
use gizi_store::{MemoryAnalysisStore, PgAnalysisStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Parsed command-line arguments
#[derive(Debug, Parser)]
#[command(name = "gizid", version, about = "Gizi Server Daemon")]
struct Args {
    /// Server config file (TOML)
    config: Option<String>,

    /// Listen port (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Use the in-memory store with one demo user instead of PostgreSQL
    #[arg(long)]
    memory: bool,

    /// Create the database tables before serving
    #[arg(long)]
    migrate: bool,

    /// Print a signed token for the given user id and exit
    #[arg(long, value_name = "USER_ID")]
    issue_token: Option<i32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "gizid=info,gizi_api=info,gizi_predict=info,gizi_store=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match args.config.as_deref() {
        Some(path) => {
            tracing::info!("Loading config from: {}", path);
            Config::load(path)?
        }
        None => Config::default(),
    };
    config.apply_env(|key| std::env::var(key).ok())?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let tokens = TokenResolver::new(config.jwt_secret());

    if let Some(user_id) = args.issue_token {
        println!("{}", tokens.issue(user_id)?);
        return Ok(());
    }

    tracing::info!("Starting gizid (Gizi Server Daemon)");

    let store = create_store(&config, &args, &tokens).await?;

    let predictor = PredictorClient::with_config(
        &config.predictor.url,
        config.predictor.timeout(),
        config.predictor.connect_timeout(),
    )
    .with_context(|| format!("Invalid predictor URL: {}", config.predictor.url))?;
    tracing::info!(url = %predictor.base_url(), "Using predictor");

    if config.auth.enforce_ownership {
        tracing::info!("DELETE restricted to the caller's own analyses");
    }

    let state = AppState::new(store, predictor, tokens)
        .with_ownership_check(config.auth.enforce_ownership);

    // Create the router
    let app = create_router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on http://{}", addr);

    // Run the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down");
    Ok(())
}

/// Build the configured store
async fn create_store(
    config: &Config,
    args: &Args,
    tokens: &TokenResolver,
) -> anyhow::Result<Arc<dyn AnalysisStore>> {
    if args.memory {
        let store = MemoryAnalysisStore::new();
        let user = store.insert_user("Demo", "demo@gizi.local");
        let token = tokens.issue(user.id)?;
        tracing::info!(
            user_id = user.id,
            %token,
            "In-memory store ready with demo user"
        );
        return Ok(Arc::new(store));
    }

    let url = config
        .database
        .url
        .as_deref()
        .context("DATABASE_URL is not set (use --memory for a throwaway store)")?;

    let pool = gizi_store::connect(url, config.database.max_connections).await?;
    let store = PgAnalysisStore::new(pool);
    if args.migrate {
        store.migrate().await?;
    }
    tracing::info!("Connected to PostgreSQL");

    Ok(Arc::new(store))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
