//! Transaction engine.
//!
//! Orchestrates the money type and the wallet/transaction/ledger stores
//! inside one DB transaction per movement: idempotency fast path, wallet
//! resolution from the movement type, deadlock-free lock ordering, funds
//! validation, paired balance deltas, double-entry emission, finalization.
//!
//! Concurrency model: many engine instances (threads or processes) may run
//! against the same database. They share wallets only through the row locks
//! taken here; the engine itself caches nothing.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use sqlx::{PgConnection, Row};

use crate::asset::{AssetManager, AssetType};
use crate::db::Database;
use crate::error::EngineError;
use crate::ledger::{EntryType, LedgerRepository};
use crate::money::Money;
use crate::transaction::{
    MovementRequest, Transaction, TransactionRepository, TransactionStatus, TransactionStoreError,
    TransactionType,
};
use crate::wallet::{SystemKind, Wallet, WalletRepository};

/// Engine tuning knobs, loaded from config.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Attempts per movement; only transient storage failures are retried.
    pub max_attempts: u32,
    /// Base delay between retries, scaled linearly per attempt.
    pub retry_backoff: Duration,
    /// Per-request deadline covering everything up to COMMIT.
    pub deadline: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_backoff: Duration::from_millis(50),
            deadline: Duration::from_secs(5),
        }
    }
}

/// Read-only balance view for one (user, asset) pair.
#[derive(Debug, Clone, Serialize)]
pub struct WalletBalance {
    pub user_id: i64,
    pub asset_type_id: i32,
    pub asset_type_code: String,
    pub balance: Money,
}

pub struct TransactionEngine {
    db: Arc<Database>,
    settings: EngineSettings,
}

impl TransactionEngine {
    pub fn new(db: Arc<Database>) -> Self {
        Self::with_settings(db, EngineSettings::default())
    }

    pub fn with_settings(db: Arc<Database>, settings: EngineSettings) -> Self {
        Self { db, settings }
    }

    /// Process one movement with the configured deadline.
    pub async fn process(&self, request: MovementRequest) -> Result<Transaction, EngineError> {
        self.process_with_deadline(request, self.settings.deadline)
            .await
    }

    /// Process one movement, committing before `deadline` or not at all.
    ///
    /// An elapsed deadline drops the in-flight DB transaction, which rolls
    /// it back and releases any row locks; no partial state is visible and
    /// the idempotency key stays free for a retry.
    pub async fn process_with_deadline(
        &self,
        request: MovementRequest,
        deadline: Duration,
    ) -> Result<Transaction, EngineError> {
        request.validate()?;

        // Optimistic idempotency fast path: a replay of a finished movement
        // returns the prior result without opening a DB transaction. The
        // authoritative check is the unique index hit in create_pending.
        if let Some(existing) =
            TransactionRepository::find_by_idempotency_key(self.db.pool(), &request.idempotency_key)
                .await?
        {
            tracing::debug!(
                idempotency_key = %request.idempotency_key,
                public_id = %existing.public_id,
                "idempotent replay"
            );
            return Ok(existing);
        }

        let asset = AssetManager::get_active_by_code(self.db.pool(), &request.asset_type)
            .await?
            .ok_or_else(|| {
                EngineError::Validation(format!(
                    "unknown or inactive asset type: {}",
                    request.asset_type
                ))
            })?;

        let give_up_at = tokio::time::Instant::now() + deadline;
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            let outcome =
                tokio::time::timeout_at(give_up_at, self.process_once(&request, &asset)).await;

            match outcome {
                Err(_) => return Err(EngineError::Timeout),
                Ok(Ok(transaction)) => {
                    tracing::info!(
                        transaction_type = %request.transaction_type,
                        public_id = %transaction.public_id,
                        user_id = request.user_id,
                        asset = %asset.code,
                        amount = %request.amount,
                        "movement committed"
                    );
                    return Ok(transaction);
                }
                Ok(Err(EngineError::DuplicateIdempotencyKey)) => {
                    // A concurrent duplicate won the insert race and has
                    // committed; surface its row verbatim.
                    if let Some(existing) = TransactionRepository::find_by_idempotency_key(
                        self.db.pool(),
                        &request.idempotency_key,
                    )
                    .await?
                    {
                        return Ok(existing);
                    }
                    // The winner rolled back after taking the key; rerun.
                    if attempt >= self.settings.max_attempts {
                        return Err(EngineError::DuplicateIdempotencyKey);
                    }
                }
                Ok(Err(err)) if err.is_transient() && attempt < self.settings.max_attempts => {
                    tracing::warn!(
                        attempt,
                        idempotency_key = %request.idempotency_key,
                        error = %err,
                        "transient storage failure, retrying movement"
                    );
                    tokio::time::sleep(self.settings.retry_backoff * attempt).await;
                }
                Ok(Err(err)) => return Err(err),
            }
        }
    }

    /// One atomic attempt: everything between BEGIN and COMMIT.
    async fn process_once(
        &self,
        request: &MovementRequest,
        asset: &AssetType,
    ) -> Result<Transaction, EngineError> {
        let mut tx = self.db.pool().begin().await?;

        // Resolve source and destination from the movement type. User
        // wallets are created lazily here; system wallets must be seeded.
        let source_principal = request.transaction_type.source_principal(request.user_id);
        let dest_principal = request
            .transaction_type
            .destination_principal(request.user_id);

        let source = resolve_wallet(&mut tx, source_principal, asset).await?;
        let dest = resolve_wallet(&mut tx, dest_principal, asset).await?;

        // Lock in ascending wallet id. Ids are monotonic per table, so this
        // is a total order over all wallets and cycles cannot form.
        let (first_id, second_id) = if source.id <= dest.id {
            (source.id, dest.id)
        } else {
            (dest.id, source.id)
        };
        let first = WalletRepository::lock(&mut tx, first_id).await?;
        let second = WalletRepository::lock(&mut tx, second_id).await?;
        let (source, dest) = if first.id == source.id {
            (first, second)
        } else {
            (second, first)
        };

        let pending = match TransactionRepository::create_pending(&mut tx, request, asset.id).await
        {
            Ok(pending) => pending,
            Err(TransactionStoreError::DuplicateIdempotencyKey) => {
                // Release the row locks before the caller re-reads the key.
                tx.rollback().await?;
                return Err(EngineError::DuplicateIdempotencyKey);
            }
            Err(TransactionStoreError::Database(e)) => return Err(e.into()),
            Err(TransactionStoreError::AlreadyTerminal(_)) => unreachable!("insert cannot finalize"),
        };

        // The source must stay non-negative after the debit. For SPEND that
        // is the user's problem; for TOPUP/BONUS a depleted system wallet is
        // an operational failure.
        if source.balance < request.amount {
            return Err(match request.transaction_type {
                TransactionType::Spend => EngineError::InsufficientFunds {
                    balance: source.balance,
                    required: request.amount,
                },
                _ => EngineError::Configuration(format!(
                    "{} wallet depleted for asset {}: balance {}, required {}",
                    SystemKind::from_principal(source.principal_id)
                        .map(SystemKind::as_str)
                        .unwrap_or("system"),
                    asset.code,
                    source.balance,
                    request.amount
                )),
            });
        }

        let debited = WalletRepository::apply_delta(&mut tx, &source, -request.amount).await?;
        let credited = WalletRepository::apply_delta(&mut tx, &dest, request.amount).await?;

        let (debit_description, credit_description) = leg_descriptions(request, &asset.code);

        LedgerRepository::append(
            &mut tx,
            pending.public_id,
            source.id,
            EntryType::Debit,
            request.amount,
            source.balance,
            debited.balance,
            &debit_description,
        )
        .await?;

        LedgerRepository::append(
            &mut tx,
            pending.public_id,
            dest.id,
            EntryType::Credit,
            request.amount,
            dest.balance,
            credited.balance,
            &credit_description,
        )
        .await?;

        let completed = match TransactionRepository::finalize(
            &mut tx,
            pending.public_id,
            TransactionStatus::Completed,
            None,
        )
        .await
        {
            Ok(completed) => completed,
            Err(TransactionStoreError::Database(e)) => return Err(e.into()),
            Err(e) => {
                return Err(EngineError::Storage(sqlx::Error::Protocol(e.to_string())));
            }
        };

        tx.commit().await?;
        Ok(completed)
    }

    /// Read-only balance lookup; takes no locks.
    pub async fn get_balance(
        &self,
        user_id: i64,
        asset_type_id: i32,
    ) -> Result<Option<WalletBalance>, EngineError> {
        let row = sqlx::query(
            r#"SELECT w.principal_id, w.asset_type_id, w.balance, a.code
               FROM wallets w
               JOIN asset_types a ON a.id = w.asset_type_id
               WHERE w.principal_id = $1 AND w.asset_type_id = $2"#,
        )
        .bind(user_id)
        .bind(asset_type_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| WalletBalance {
            user_id: r.get("principal_id"),
            asset_type_id: r.get("asset_type_id"),
            asset_type_code: r.get("code"),
            balance: r.get("balance"),
        }))
    }
}

/// Fetch a movement endpoint wallet. User wallets are created lazily;
/// system wallets must already exist for the asset.
async fn resolve_wallet(
    conn: &mut PgConnection,
    principal_id: i64,
    asset: &AssetType,
) -> Result<Wallet, EngineError> {
    match SystemKind::from_principal(principal_id) {
        None => Ok(WalletRepository::get_or_create(conn, principal_id, asset.id).await?),
        Some(kind) => {
            let existing =
                WalletRepository::get_by_principal_and_asset(conn, principal_id, asset.id).await?;

            existing.ok_or_else(|| {
                EngineError::Configuration(format!(
                    "{} wallet not found for asset {}",
                    kind.as_str(),
                    asset.code
                ))
            })
        }
    }
}

fn leg_descriptions(request: &MovementRequest, asset_code: &str) -> (String, String) {
    match request.transaction_type {
        TransactionType::Topup => (
            format!(
                "User {} purchased {} {}",
                request.user_id, request.amount, asset_code
            ),
            format!("Purchased {} {}", request.amount, asset_code),
        ),
        TransactionType::Bonus => (
            format!("Bonus granted to user {}", request.user_id),
            format!("Received {} {} bonus", request.amount, asset_code),
        ),
        TransactionType::Spend => (
            format!(
                "User {} spent {} {}",
                request.user_id, request.amount, asset_code
            ),
            format!("Revenue from user {} spend", request.user_id),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(transaction_type: TransactionType) -> MovementRequest {
        MovementRequest {
            idempotency_key: "k1".to_string(),
            transaction_type,
            user_id: 7,
            asset_type: "COIN".to_string(),
            amount: "100.00000000".parse().unwrap(),
            metadata: None,
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = EngineSettings::default();
        assert_eq!(settings.max_attempts, 3);
        assert!(settings.retry_backoff < settings.deadline);
    }

    #[test]
    fn test_leg_descriptions_name_the_counterparty() {
        let (debit, credit) = leg_descriptions(&request(TransactionType::Topup), "COIN");
        assert_eq!(debit, "User 7 purchased 100.00000000 COIN");
        assert_eq!(credit, "Purchased 100.00000000 COIN");

        let (debit, credit) = leg_descriptions(&request(TransactionType::Bonus), "COIN");
        assert_eq!(debit, "Bonus granted to user 7");
        assert_eq!(credit, "Received 100.00000000 COIN bonus");

        let (debit, credit) = leg_descriptions(&request(TransactionType::Spend), "COIN");
        assert_eq!(debit, "User 7 spent 100.00000000 COIN");
        assert_eq!(credit, "Revenue from user 7 spend");
    }
}
