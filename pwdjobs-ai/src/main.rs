//! pwdjobs-ai - Assessment & Verification microservice
//!
//! **Module Identity:**
//! - Name: pwdjobs-ai
//! - Default port: 5730
//!
//! Scores skill quizzes and job challenges, analyzes skill gaps, generates
//! learning roadmaps and verifies PWD identity documents for the PWD job
//! platform.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pwdjobs_ai::ai::AiClient;
use pwdjobs_ai::config::{resolve_ai_api_key, ScoringSettings};
use pwdjobs_ai::services::{RegistryClient, SyncQueue};
use pwdjobs_ai::AppState;
use pwdjobs_common::config as common_config;

const DEFAULT_PORT: u16 = 5730;

/// Command-line arguments for pwdjobs-ai
#[derive(Parser, Debug)]
#[command(name = "pwdjobs-ai")]
#[command(about = "Assessment and verification microservice for the PWD job platform")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides the TOML `port`)
    #[arg(short, long, env = "PWDJOBS_PORT")]
    port: Option<u16>,

    /// Bootstrap TOML config file (else `PWDJOBS_CONFIG`, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root folder holding the database (else `PWDJOBS_ROOT_FOLDER`, then TOML)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1", env = "PWDJOBS_BIND")]
    bind: std::net::IpAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config first: it carries the default log level
    let toml_config =
        common_config::load_or_default(args.config.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| toml_config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting pwdjobs-ai (Assessment & Verification) microservice");
    info!(
        "Version: {} (git {}, {} build, {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_PROFILE"),
        env!("BUILD_TIMESTAMP")
    );

    // Root folder: CLI → ENV → TOML → OS default
    let root_folder = common_config::resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    std::fs::create_dir_all(&root_folder)
        .with_context(|| format!("Failed to create root folder {}", root_folder.display()))?;
    info!("Root folder: {}", root_folder.display());

    let db_path = common_config::database_path(&root_folder);
    info!("Database: {}", db_path.display());
    let db_pool = pwdjobs_ai::db::init_database_pool(&db_path)
        .await
        .context("Failed to open database")?;

    let api_key = resolve_ai_api_key(&toml_config);
    let ai = AiClient::from_config(&toml_config.ai, api_key).context("Failed to build model client")?;

    let registry = RegistryClient::from_config(&toml_config.registry).context("Failed to build registry client")?;
    info!(
        url = %toml_config.registry.base_url,
        timeout_secs = toml_config.registry.timeout_secs,
        "Registry client configured"
    );

    let sync = SyncQueue::from_config(&toml_config.sync);
    let scoring = ScoringSettings::resolve(&db_pool, &toml_config.scoring).await;

    let state = AppState::new(db_pool, ai, registry, sync)
        .with_scoring(scoring)
        .with_verification(toml_config.verification.clone());

    let app = pwdjobs_ai::build_router(state);

    let port = args.port.or(toml_config.port).unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::new(args.bind, port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
