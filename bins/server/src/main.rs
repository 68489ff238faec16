//! Filekeep API Server
//!
//! Main entry point for the Filekeep file service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sea_orm_migration::MigratorTrait;
use tokio::{net::TcpListener, signal, sync::Notify};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use filekeep_api::{AppState, HttpLimits, create_router};
use filekeep_core::{
    file::FileService,
    naming::UuidNameGenerator,
    storage::{BlobStore, OpendalBlobStore},
};
use filekeep_db::{FileRepository, Migrator, connect};
use filekeep_shared::{AppConfig, config::Environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(config.environment);

    // Connect to database
    let db = connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    if config.database.run_migrations {
        Migrator::up(&db, None)
            .await
            .context("Failed to apply migrations")?;
        info!("Migrations applied");
    }

    // Blob storage
    let blobs = OpendalBlobStore::from_provider(&config.storage.provider)
        .context("Failed to initialize blob storage")?;
    info!(
        storage_type = config.storage.provider.name(),
        location = %blobs.location(),
        "Blob storage configured"
    );

    let files = FileService::new(
        Arc::new(FileRepository::new(db.clone())),
        Arc::new(blobs),
        Arc::new(UuidNameGenerator::new()),
    );

    if config.auth.credentials().is_none() {
        info!("Basic authentication disabled");
    }

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        files: Arc::new(files),
        auth: Arc::new(config.auth.clone()),
    };

    // Create router
    let app = create_router(state, HttpLimits::from_config(&config));

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    let shutdown = Arc::new(Notify::new());
    let server = axum::serve(listener, app).with_graceful_shutdown({
        let shutdown = Arc::clone(&shutdown);
        async move {
            shutdown_signal().await;
            shutdown.notify_one();
        }
    });
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);

    match run_until_drained(server.into_future(), &shutdown, shutdown_timeout).await {
        Some(result) => result?,
        None => warn!(
            timeout_secs = config.server.shutdown_timeout_secs,
            "Graceful shutdown timed out, dropping open connections"
        ),
    }

    info!("Server stopped");
    Ok(())
}

/// JSON lines outside local development, human-readable output otherwise. `RUST_LOG` wins over
/// the environment's default filter.
fn init_tracing(environment: Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| environment.default_log_filter().into());
    let registry = tracing_subscriber::registry().with(filter);

    if environment.json_logs() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Drives `server` to completion, or gives up `timeout` after `shutdown` is notified.
async fn run_until_drained<F: Future>(
    server: F,
    shutdown: &Notify,
    timeout: Duration,
) -> Option<F::Output> {
    tokio::select! {
        output = server => Some(output),
        () = async {
            shutdown.notified().await;
            tokio::time::sleep(timeout).await;
        } => None,
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Received termination signal, shutting down");
}
