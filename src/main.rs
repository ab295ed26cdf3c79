use std::sync::Arc;

use anyhow::{Context, Result};

use coinledger::config::AppConfig;
use coinledger::db::Database;
use coinledger::engine::TransactionEngine;
use coinledger::gateway::{self, state::AppState};
use coinledger::{logging, schema};

#[tokio::main]
async fn main() -> Result<()> {
    let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env)?;
    let _guard = logging::init_logging(&config);

    tracing::info!(
        "coinledger v{} starting (env: {})",
        env!("CARGO_PKG_VERSION"),
        env
    );

    let db = Arc::new(connect_with_retry(&config).await?);

    schema::init_schema(db.pool())
        .await
        .context("Schema initialization failed")?;

    let seed_amounts = config.seed.amounts()?;
    schema::seed(db.pool(), &seed_amounts)
        .await
        .context("Seeding failed")?;
    schema::verify_system_wallets(db.pool())
        .await
        .context("System wallet verification failed")?;

    let engine = Arc::new(TransactionEngine::with_settings(
        db.clone(),
        config.engine.settings(),
    ));
    let state = Arc::new(AppState::new(engine, db));

    gateway::run_server(&config.gateway, state).await
}

/// Connect to PostgreSQL, retrying with capped exponential backoff so the
/// service survives the database coming up after it.
async fn connect_with_retry(config: &AppConfig) -> Result<Database> {
    const MAX_RETRIES: u32 = 10;
    let mut retry_delay_ms = 1000u64;

    for attempt in 1..=MAX_RETRIES {
        match Database::connect(
            &config.database.url,
            config.database.max_connections,
            config.database.acquire_timeout(),
        )
        .await
        {
            Ok(db) => {
                tracing::info!("Connected to PostgreSQL (attempt {})", attempt);
                return Ok(db);
            }
            Err(e) if attempt < MAX_RETRIES => {
                tracing::warn!(
                    "PostgreSQL connection attempt {} failed: {}. Retrying in {}ms...",
                    attempt,
                    e,
                    retry_delay_ms
                );
                tokio::time::sleep(tokio::time::Duration::from_millis(retry_delay_ms)).await;
                retry_delay_ms = (retry_delay_ms * 2).min(30_000);
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to connect to PostgreSQL after {} attempts", MAX_RETRIES)
                });
            }
        }
    }

    unreachable!("retry loop returns on success or final error")
}
