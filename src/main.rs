use std::sync::Arc;

use anyhow::Context;
use internship_portal::{
    config::{AppConfig, StorageBackend},
    database::{models::NewUser, MemoryStore, PgStore, PortalStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();
    internship_portal::init_tracing("internship_portal=info,tower_http=info");

    let config = internship_portal::config::config().clone();
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting internship portal in {:?} mode", config.environment);

    let store: Arc<dyn PortalStore> = match config.database.storage {
        StorageBackend::Postgres => {
            let store = PgStore::connect(&config.database).await?;
            store.migrate().await.context("schema migration failed")?;
            Arc::new(store)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, store);
    bootstrap_principal(&state).await?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Internship portal listening on http://{}", bind_addr);

    axum::serve(listener, internship_portal::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Create the first principal from `PORTAL_BOOTSTRAP_EMAIL` / `PORTAL_BOOTSTRAP_PASSWORD`
async fn bootstrap_principal(state: &AppState) -> anyhow::Result<()> {
    let (Ok(email), Ok(password)) = (
        std::env::var("PORTAL_BOOTSTRAP_EMAIL"),
        std::env::var("PORTAL_BOOTSTRAP_PASSWORD"),
    ) else {
        return Ok(());
    };

    let name = std::env::var("PORTAL_BOOTSTRAP_NAME").unwrap_or_else(|_| "Principal".to_string());
    let principal = state
        .service
        .ensure_principal(NewUser {
            email,
            name,
            password,
            department: None,
            roll_number: None,
        })
        .await
        .map_err(|e| anyhow::anyhow!("bootstrap principal: {}", e))?;

    tracing::info!("Bootstrap principal is {} ({})", principal.email, principal.id);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
