//! Blog Server
//!
//! CRUD HTTP service for users and posts, backed by a relational store.
//!
//! Uses SQLite (embedded) instead of PostgreSQL for simplicity.

mod config;
mod error;
mod extractors;
mod handlers;
mod storage;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use blog_core::{BlogStore, IdProvider, UuidProvider};
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use storage::{MemoryStore, SqliteStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BlogStore>,
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    let config = Config::parse();

    if let Err(e) = init_tracing(&config.log_level) {
        eprintln!("[FATAL] Failed to initialize logging: {:#}", e);
        std::process::exit(1);
    }

    info!("Starting Blog Server v{}", env!("CARGO_PKG_VERSION"));
    info!("PID: {}", std::process::id());

    if let Err(e) = run_server(config).await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("Invalid log level: {}", level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

async fn run_server(config: Config) -> Result<()> {
    info!(
        "Config loaded: bind={}, db={}, in_memory={}",
        config.bind_address,
        config.database_path.display(),
        config.in_memory
    );

    let ids: Arc<dyn IdProvider> = Arc::new(UuidProvider);
    let store: Arc<dyn BlogStore> = if config.in_memory {
        warn!("Using in-memory store, data is lost on exit");
        Arc::new(MemoryStore::new(ids))
    } else {
        Arc::new(
            SqliteStore::open(&config.database_path, ids)
                .await
                .context("Failed to initialize database")?,
        )
    };

    let app = router(AppState {
        store: store.clone(),
    });

    let listener = TcpListener::bind(config.bind_address)
        .await
        .context("Failed to bind to address")?;
    info!("Server listening on {}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    store.close().await;
    info!("Server shutdown complete");
    Ok(())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/users",
            get(handlers::users::get)
                .post(handlers::users::create)
                .put(handlers::users::update)
                .delete(handlers::users::delete),
        )
        .route(
            "/posts",
            get(handlers::posts::get)
                .post(handlers::posts::create)
                .put(handlers::posts::update)
                .delete(handlers::posts::delete),
        )
        .route("/posts/all", get(handlers::posts::list))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
        _ = ctrl_c => warn!("Received Ctrl+C, shutting down"),
        _ = terminate => warn!("Received SIGTERM, shutting down"),
    }
}
