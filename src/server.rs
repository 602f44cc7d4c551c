use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;
use tokio::signal;

use crate::app::{app, AppState};
use crate::auth::TokenCodec;
use crate::config::AppConfig;
use crate::database::{DatabaseManager, IdeaStore, MemoryIdeaStore, PgIdeaStore};

/// Build the signing codec from configuration; a bad secret stops startup
pub fn token_codec(config: &AppConfig) -> anyhow::Result<TokenCodec> {
    TokenCodec::new(
        &config.security.jwt_secret,
        Duration::minutes(config.security.jwt_expiry_minutes),
    )
    .context("failed to initialize token codec")
}

/// Open the configured store: PostgreSQL when a URL is set, in-memory otherwise
pub async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn IdeaStore>> {
    if config.database.url.is_none() {
        tracing::warn!("DATABASE_URL not set; using in-memory store, data will not persist");
        return Ok(Arc::new(MemoryIdeaStore::new()));
    }

    let manager = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    Ok(Arc::new(PgIdeaStore::new(manager)))
}

/// Serve the API until Ctrl-C or SIGTERM, then close the store
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Ideas API in {:?} mode", config.environment);

    let tokens = token_codec(&config)?;
    let store = open_store(&config).await?;
    let port = config.server.port;

    let state = AppState::new(config, tokens, store.clone());

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Server is running on port: {}", port);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
