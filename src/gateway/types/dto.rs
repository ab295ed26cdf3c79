//! Request and response DTOs for the HTTP surface.
//!
//! Money travels as canonical decimal strings with 8 fractional digits; the
//! strict serde layer on [`Money`] rejects JSON numbers and sloppy formats
//! before any business validation runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::engine::WalletBalance;
use crate::money::Money;
use crate::transaction::{Transaction, TransactionStatus, TransactionType};

/// Body shared by the topup/bonus/spend endpoints.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MovementBody {
    #[schema(example = "order-2024-000137")]
    pub idempotency_key: String,
    #[schema(example = 7)]
    pub user_id: i64,
    /// Asset code, e.g. "COIN".
    #[schema(example = "COIN")]
    pub asset_type: String,
    /// Canonical decimal string, strictly positive.
    #[schema(value_type = String, example = "100.00000000")]
    pub amount: Money,
    #[schema(value_type = Object)]
    pub metadata: Option<serde_json::Value>,
}

impl MovementBody {
    pub fn into_request(self, transaction_type: TransactionType) -> crate::transaction::MovementRequest {
        crate::transaction::MovementRequest {
            idempotency_key: self.idempotency_key,
            transaction_type,
            user_id: self.user_id,
            asset_type: self.asset_type,
            amount: self.amount,
            metadata: self.metadata,
        }
    }
}

/// A movement as returned to callers.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionResponse {
    pub public_id: Uuid,
    pub idempotency_key: String,
    #[schema(value_type = String, example = "TOPUP")]
    pub transaction_type: TransactionType,
    pub user_id: i64,
    pub asset_type_id: i32,
    #[schema(value_type = String, example = "100.00000000")]
    pub amount: Money,
    #[schema(value_type = String, example = "COMPLETED")]
    pub status: TransactionStatus,
    #[schema(value_type = Object)]
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        Self {
            public_id: t.public_id,
            idempotency_key: t.idempotency_key,
            transaction_type: t.transaction_type,
            user_id: t.user_id,
            asset_type_id: t.asset_type_id,
            amount: t.amount,
            status: t.status,
            metadata: t.metadata,
            created_at: t.created_at,
            completed_at: t.completed_at,
        }
    }
}

/// Balance of one (user, asset) wallet.
#[derive(Debug, Serialize, ToSchema)]
pub struct WalletBalanceResponse {
    pub user_id: i64,
    pub asset_type_id: i32,
    #[schema(example = "COIN")]
    pub asset_type_code: String,
    #[schema(value_type = String, example = "100.00000000")]
    pub balance: Money,
}

impl From<WalletBalance> for WalletBalanceResponse {
    fn from(b: WalletBalance) -> Self {
        Self {
            user_id: b.user_id,
            asset_type_id: b.asset_type_id,
            asset_type_code: b.asset_type_code,
            balance: b.balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_body_strict_amount() {
        let body: MovementBody = serde_json::from_str(
            r#"{"idempotency_key":"k1","user_id":7,"asset_type":"COIN","amount":"100.00000000"}"#,
        )
        .unwrap();
        assert_eq!(body.amount.to_string(), "100.00000000");
        assert!(body.metadata.is_none());

        // JSON numbers bypass format validation, so they are rejected.
        let result: Result<MovementBody, _> = serde_json::from_str(
            r#"{"idempotency_key":"k1","user_id":7,"asset_type":"COIN","amount":100}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_transaction_response_serializes_upper_case_enums() {
        let body = TransactionResponse {
            public_id: Uuid::nil(),
            idempotency_key: "k1".to_string(),
            transaction_type: TransactionType::Spend,
            user_id: 7,
            asset_type_id: 1,
            amount: "100.00000000".parse().unwrap(),
            status: TransactionStatus::Completed,
            metadata: None,
            created_at: Utc::now(),
            completed_at: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["transaction_type"], "SPEND");
        assert_eq!(json["status"], "COMPLETED");
        assert_eq!(json["amount"], "100.00000000");
    }
}
