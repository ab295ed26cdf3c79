//! Repository layer for ledger entries. Append-only.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::models::{EntryType, LedgerEntry};
use crate::money::Money;

pub struct LedgerRepository;

impl LedgerRepository {
    /// Append one leg of a posting inside the movement's DB transaction.
    #[allow(clippy::too_many_arguments)]
    pub async fn append(
        conn: &mut PgConnection,
        transaction_public_id: Uuid,
        wallet_id: i64,
        entry_type: EntryType,
        amount: Money,
        balance_before: Money,
        balance_after: Money,
        description: &str,
    ) -> Result<LedgerEntry, sqlx::Error> {
        sqlx::query_as(
            r#"INSERT INTO ledger_entries
                   (transaction_public_id, wallet_id, entry_type, amount,
                    balance_before, balance_after, description)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id, transaction_public_id, wallet_id, entry_type, amount,
                         balance_before, balance_after, description, created_at"#,
        )
        .bind(transaction_public_id)
        .bind(wallet_id)
        .bind(entry_type.as_str())
        .bind(amount)
        .bind(balance_before)
        .bind(balance_after)
        .bind(description)
        .fetch_one(&mut *conn)
        .await
    }

    /// All legs recorded for one transaction, in insertion order.
    pub async fn list_for_transaction(
        pool: &PgPool,
        transaction_public_id: Uuid,
    ) -> Result<Vec<LedgerEntry>, sqlx::Error> {
        sqlx::query_as(
            r#"SELECT id, transaction_public_id, wallet_id, entry_type, amount,
                      balance_before, balance_after, description, created_at
               FROM ledger_entries
               WHERE transaction_public_id = $1
               ORDER BY id"#,
        )
        .bind(transaction_public_id)
        .fetch_all(pool)
        .await
    }

    /// All legs touching one wallet, oldest first. Used for audit queries.
    pub async fn list_for_wallet(
        pool: &PgPool,
        wallet_id: i64,
    ) -> Result<Vec<LedgerEntry>, sqlx::Error> {
        sqlx::query_as(
            r#"SELECT id, transaction_public_id, wallet_id, entry_type, amount,
                      balance_before, balance_after, description, created_at
               FROM ledger_entries
               WHERE wallet_id = $1
               ORDER BY id"#,
        )
        .bind(wallet_id)
        .fetch_all(pool)
        .await
    }
}
