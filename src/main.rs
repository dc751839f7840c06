use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use statements_api::config::AppConfig;
use statements_api::database::DatabaseManager;
use statements_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DSN, MODE, REALM, etc.
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env()?;

    let default_level = if config.is_production() { "info" } else { "debug" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    tracing::info!("Starting {} in {:?} mode", config.app_name, config.environment);

    let db = Arc::new(DatabaseManager::new(config.database.clone())?);
    db.migrate().await.context("failed to migrate database")?;

    let port = config.port;
    let app = statements_api::app(AppState::postgres(config, db.clone()));

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    db.close().await;
    Ok(())
}
