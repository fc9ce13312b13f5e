//! # Checklist Server
//!
//! Serves the checklist HTTP API.
//!
//! ## Usage
//!
//! ```bash
//! # Run against PostgreSQL using config/checklist.toml
//! DATABASE_URL=postgresql://localhost/checklist cargo run --bin checklist-server
//!
//! # Run with the in-memory store on another port
//! cargo run --bin checklist-server -- --store memory --bind 127.0.0.1:8080
//! ```

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use checklist_core::config::{ConfigManager, StoreBackend};
use checklist_core::database::{DatabaseConnection, DatabaseMigrations};
use checklist_core::logging;
use checklist_core::services::ChecklistService;
use checklist_core::store::{ChecklistStore, MemoryChecklistStore, PgChecklistStore};
use checklist_core::web::{create_app, AppState};

#[derive(Parser)]
#[command(name = "checklist-server")]
#[command(about = "Serve shared checklists over HTTP")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration directory (default: config)
    #[arg(short, long, env = "CHECKLIST_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Environment name (development, test, production)
    #[arg(short, long, env = "CHECKLIST_ENV")]
    environment: Option<String>,

    /// Address to listen on, overriding web.bind_address
    #[arg(short, long)]
    bind: Option<String>,

    /// Store backend (postgres or memory), overriding store.backend
    #[arg(long)]
    store: Option<StoreBackend>,

    /// Do not apply database migrations at start-up
    #[arg(long)]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_structured_logging();

    info!("Starting checklist server v{}", env!("CARGO_PKG_VERSION"));

    let environment = cli
        .environment
        .clone()
        .unwrap_or_else(ConfigManager::detect_environment);
    let manager = ConfigManager::load_from_directory_with_env(cli.config_dir.clone(), &environment)
        .context("Failed to load configuration")?;

    let mut config = manager.config().clone();
    if let Some(bind) = cli.bind {
        config.web.bind_address = bind;
    }
    if let Some(backend) = cli.store {
        config.store.backend = backend;
    }
    config.validate().context("Invalid configuration")?;

    let (store, database): (Arc<dyn ChecklistStore>, Option<DatabaseConnection>) =
        match config.store.backend {
            StoreBackend::Postgres => {
                let database = DatabaseConnection::connect_with_retry(&config.database)
                    .await
                    .context("Failed to connect to database")?;
                if !cli.skip_migrations {
                    DatabaseMigrations::run_all(database.pool())
                        .await
                        .context("Failed to run migrations")?;
                }
                let store: Arc<dyn ChecklistStore> =
                    Arc::new(PgChecklistStore::new(database.pool().clone()));
                (store, Some(database))
            }
            StoreBackend::Memory => {
                info!("Using in-memory store; data is lost on shutdown");
                let store: Arc<dyn ChecklistStore> = Arc::new(MemoryChecklistStore::new());
                (store, None)
            }
        };

    let service = ChecklistService::new(store, config.checklist.clone());
    let state = AppState::new(service, config.web.clone());
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&config.web.bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", config.web.bind_address))?;
    info!(
        bind_address = %config.web.bind_address,
        environment = %environment,
        "Checklist server listening"
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Some(database) = database {
        database.close().await;
        info!("Database pool closed");
    }

    if let Err(e) = served {
        error!("Checklist server error: {}", e);
        return Err(e.into());
    }

    info!("Checklist server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received SIGTERM");
        },
    }
}
