mod adapters;
mod app;
mod config;
mod handlers;
mod loader;
mod state;

use std::{path::Path, sync::Arc};

use anyhow::Result;
use clap::Parser;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{PostgresBackend, QueuedSqliteBackend, SyncSqliteBackend},
    app::create_app,
    config::Config,
    state::{AppState, DynBackend},
};

/// dbbench - Compare query latency across SQLite and PostgreSQL backends
#[derive(Parser, Debug)]
#[command(name = "dbbench")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3333", env = "PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dbbench=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    ensure_data_dirs(&config)?;

    // Construct the backends up front; the pool dials lazily, so an
    // unreachable PostgreSQL shows up during its load, not here.
    let sync = SyncSqliteBackend::open(&config.sqlite_sync_path, config.sqlite_max_parameters)?;
    let queued =
        QueuedSqliteBackend::open(&config.sqlite_queued_path, config.sqlite_max_parameters).await?;
    let postgres = PostgresBackend::connect_lazy(&config)?;
    let backends: Vec<DynBackend> = vec![Arc::new(sync), Arc::new(queued), Arc::new(postgres)];

    tracing::info!(
        users = config.user_rows,
        orders = config.order_rows,
        "generating datasets"
    );
    let users = loader::generate_users(config.user_rows);
    let orders = loader::generate_orders(config.order_rows);

    for backend in &backends {
        loader::initialize(backend.as_ref(), users.clone(), orders.clone()).await;
    }
    drop((users, orders));

    let app = create_app(AppState::new(backends));

    // The listener opens only after all loads have settled, so no request
    // can race an unfinished load.
    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Make sure the parent directories of the embedded database files exist.
fn ensure_data_dirs(config: &Config) -> Result<()> {
    for path in [&config.sqlite_sync_path, &config.sqlite_queued_path] {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    Ok(())
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
