//! Engine-level error kinds.

use thiserror::Error;

use crate::money::Money;
use crate::wallet::WalletError;

/// Errors surfaced by the transaction engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid request: amount, user id, idempotency key, or an
    /// unknown/inactive asset.
    #[error("validation error: {0}")]
    Validation(String),

    /// A SPEND debit would overdraw the user wallet.
    #[error("insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds { balance: Money, required: Money },

    /// Missing or depleted system wallet, or broken seed state.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal signal: another submission holds this idempotency key.
    /// Resolved by re-reading and returning the existing transaction.
    #[error("transaction with this idempotency key already exists")]
    DuplicateIdempotencyKey,

    /// Unexpected database failure.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// The per-request deadline elapsed before commit.
    #[error("deadline exceeded before commit")]
    Timeout,
}

impl EngineError {
    /// Deadlocks, lock-wait timeouts and serialization failures are worth a
    /// bounded retry; everything else propagates immediately.
    pub fn is_transient(&self) -> bool {
        match self {
            EngineError::Storage(sqlx::Error::Database(db)) => matches!(
                db.code().as_deref(),
                Some("40001") | Some("40P01") | Some("55P03")
            ),
            EngineError::Storage(sqlx::Error::PoolTimedOut) => true,
            _ => false,
        }
    }
}

impl From<WalletError> for EngineError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Database(e) => EngineError::Storage(e),
            // The engine validates funds before applying deltas, so this is
            // a last-line guard for a debit racing past validation.
            WalletError::InvariantViolation { balance, delta } => EngineError::InsufficientFunds {
                balance,
                required: delta.abs(),
            },
            WalletError::Arithmetic(e) => {
                EngineError::Validation(format!("amount out of range: {e}"))
            }
        }
    }
}

/// True when `err` is a Postgres unique violation on the named constraint.
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            db.code().as_deref() == Some("23505") && db.constraint() == Some(constraint)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_storage_errors_are_not_transient() {
        assert!(!EngineError::Validation("bad".to_string()).is_transient());
        assert!(!EngineError::Timeout.is_transient());
        assert!(!EngineError::DuplicateIdempotencyKey.is_transient());
        assert!(
            !EngineError::InsufficientFunds {
                balance: Money::ZERO,
                required: "1".parse().unwrap(),
            }
            .is_transient()
        );
    }

    #[test]
    fn test_pool_timeout_is_transient() {
        assert!(EngineError::Storage(sqlx::Error::PoolTimedOut).is_transient());
        assert!(!EngineError::Storage(sqlx::Error::RowNotFound).is_transient());
    }

    #[test]
    fn test_invariant_violation_maps_to_insufficient_funds() {
        let err = WalletError::InvariantViolation {
            balance: "5".parse().unwrap(),
            delta: "-7".parse().unwrap(),
        };
        match EngineError::from(err) {
            EngineError::InsufficientFunds { balance, required } => {
                assert_eq!(balance.to_string(), "5.00000000");
                assert_eq!(required.to_string(), "7.00000000");
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }
}
