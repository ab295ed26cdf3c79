//! Schema bootstrap and seeding for the ledger database.
//!
//! Four tables: `asset_types`, `wallets`, `transactions`, `ledger_entries`.
//! `init_schema` and `seed` are both idempotent and safe to run at every
//! startup.

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::asset::AssetManager;
use crate::error::EngineError;
use crate::money::Money;
use crate::wallet::SystemKind;

/// Create all tables and indexes.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    tracing::info!("Initializing ledger schema...");

    sqlx::query(CREATE_ASSET_TYPES_TABLE)
        .execute(pool)
        .await
        .context("Failed to create asset_types table")?;

    sqlx::query(CREATE_WALLETS_TABLE)
        .execute(pool)
        .await
        .context("Failed to create wallets table")?;

    sqlx::query(CREATE_WALLETS_SYSTEM_INDEX)
        .execute(pool)
        .await
        .context("Failed to create wallets system index")?;

    sqlx::query(CREATE_TRANSACTIONS_TABLE)
        .execute(pool)
        .await
        .context("Failed to create transactions table")?;

    sqlx::query(CREATE_TRANSACTIONS_USER_INDEX)
        .execute(pool)
        .await
        .context("Failed to create transactions user index")?;

    sqlx::query(CREATE_LEDGER_ENTRIES_TABLE)
        .execute(pool)
        .await
        .context("Failed to create ledger_entries table")?;

    sqlx::query(CREATE_LEDGER_TRANSACTION_INDEX)
        .execute(pool)
        .await
        .context("Failed to create ledger transaction index")?;

    sqlx::query(CREATE_LEDGER_WALLET_INDEX)
        .execute(pool)
        .await
        .context("Failed to create ledger wallet index")?;

    tracing::info!("Ledger schema initialized");
    Ok(())
}

/// Initial balances for the pre-funded system wallets.
#[derive(Debug, Clone)]
pub struct SeedAmounts {
    pub treasury_initial: Money,
    pub marketing_initial: Money,
}

impl Default for SeedAmounts {
    fn default() -> Self {
        Self {
            treasury_initial: "1000000".parse().expect("valid treasury default"),
            marketing_initial: "100000".parse().expect("valid marketing default"),
        }
    }
}

impl SystemKind {
    fn initial_balance(self, amounts: &SeedAmounts) -> Money {
        match self {
            SystemKind::Treasury => amounts.treasury_initial,
            SystemKind::Marketing => amounts.marketing_initial,
            SystemKind::Revenue => Money::ZERO,
        }
    }
}

/// Seed the asset catalog and the three system wallets per active asset.
///
/// Existing rows are left untouched, so re-running on a live database never
/// resets balances.
pub async fn seed(pool: &PgPool, amounts: &SeedAmounts) -> Result<()> {
    sqlx::query(
        r#"INSERT INTO asset_types (code, display_name)
           VALUES ('COIN', 'Coins'), ('GEM', 'Gems'), ('GOLD', 'Gold')
           ON CONFLICT (code) DO NOTHING"#,
    )
    .execute(pool)
    .await
    .context("Failed to seed asset_types")?;

    let assets = AssetManager::load_active(pool)
        .await
        .context("Failed to load active assets")?;

    for asset in &assets {
        for kind in SystemKind::ALL {
            sqlx::query(
                r#"INSERT INTO wallets (principal_id, asset_type_id, balance, is_system, system_kind)
                   VALUES ($1, $2, $3, TRUE, $4)
                   ON CONFLICT (principal_id, asset_type_id) DO NOTHING"#,
            )
            .bind(kind.principal_id())
            .bind(asset.id)
            .bind(kind.initial_balance(amounts))
            .bind(kind.as_str())
            .execute(pool)
            .await
            .with_context(|| {
                format!("Failed to seed {} wallet for asset {}", kind.as_str(), asset.code)
            })?;
        }
    }

    tracing::info!(assets = assets.len(), "System wallets seeded");
    Ok(())
}

/// Confirm that every active asset has its three system wallets.
pub async fn verify_system_wallets(pool: &PgPool) -> Result<(), EngineError> {
    let assets = AssetManager::load_active(pool).await?;

    for asset in &assets {
        for kind in SystemKind::ALL {
            let found: Option<i64> = sqlx::query_scalar(
                "SELECT id FROM wallets WHERE principal_id = $1 AND asset_type_id = $2",
            )
            .bind(kind.principal_id())
            .bind(asset.id)
            .fetch_optional(pool)
            .await?;

            if found.is_none() {
                return Err(EngineError::Configuration(format!(
                    "{} wallet not found for asset {}",
                    kind.as_str(),
                    asset.code
                )));
            }
        }
    }

    Ok(())
}

const CREATE_ASSET_TYPES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS asset_types (
    id SERIAL PRIMARY KEY,
    code VARCHAR(50) NOT NULL,
    display_name VARCHAR(100) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT uq_asset_types_code UNIQUE (code)
)
"#;

const CREATE_WALLETS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS wallets (
    id BIGSERIAL PRIMARY KEY,
    principal_id BIGINT NOT NULL,
    asset_type_id INTEGER NOT NULL REFERENCES asset_types(id),
    balance NUMERIC(20, 8) NOT NULL DEFAULT 0,
    is_system BOOLEAN NOT NULL DEFAULT FALSE,
    system_kind VARCHAR(50),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT uq_wallets_principal_asset UNIQUE (principal_id, asset_type_id),
    CONSTRAINT chk_wallets_balance_non_negative CHECK (balance >= 0)
)
"#;

const CREATE_WALLETS_SYSTEM_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_wallets_system ON wallets (is_system, system_kind)
"#;

const CREATE_TRANSACTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    id BIGSERIAL PRIMARY KEY,
    public_id UUID NOT NULL,
    idempotency_key VARCHAR(100) NOT NULL,
    transaction_type VARCHAR(50) NOT NULL,
    user_id BIGINT NOT NULL,
    asset_type_id INTEGER NOT NULL REFERENCES asset_types(id),
    amount NUMERIC(20, 8) NOT NULL,
    status VARCHAR(50) NOT NULL DEFAULT 'PENDING',
    metadata JSONB,
    error_message TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    completed_at TIMESTAMPTZ,
    CONSTRAINT uq_transactions_public_id UNIQUE (public_id),
    CONSTRAINT uq_transactions_idempotency_key UNIQUE (idempotency_key),
    CONSTRAINT chk_transactions_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_transactions_status_valid
        CHECK (status IN ('PENDING', 'COMPLETED', 'FAILED'))
)
"#;

const CREATE_TRANSACTIONS_USER_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_transactions_user_asset
    ON transactions (user_id, asset_type_id, status)
"#;

const CREATE_LEDGER_ENTRIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ledger_entries (
    id BIGSERIAL PRIMARY KEY,
    transaction_public_id UUID NOT NULL REFERENCES transactions(public_id),
    wallet_id BIGINT NOT NULL REFERENCES wallets(id),
    entry_type VARCHAR(10) NOT NULL,
    amount NUMERIC(20, 8) NOT NULL,
    balance_before NUMERIC(20, 8) NOT NULL,
    balance_after NUMERIC(20, 8) NOT NULL,
    description VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT chk_ledger_entries_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_ledger_entries_entry_type_valid
        CHECK (entry_type IN ('DEBIT', 'CREDIT'))
)
"#;

const CREATE_LEDGER_TRANSACTION_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_ledger_entries_transaction
    ON ledger_entries (transaction_public_id)
"#;

const CREATE_LEDGER_WALLET_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_ledger_entries_wallet
    ON ledger_entries (wallet_id, created_at)
"#;
