//! Data models for movements.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::EngineError;
use crate::money::Money;
use crate::wallet::SystemKind;

/// Movement kind. Each type fixes a source and a destination wallet and the
/// debit/credit convention between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// User purchases coins: TREASURY -> user.
    Topup,
    /// Marketing grants coins: MARKETING -> user.
    Bonus,
    /// User spends coins: user -> REVENUE.
    Spend,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Topup => "TOPUP",
            TransactionType::Bonus => "BONUS",
            TransactionType::Spend => "SPEND",
        }
    }

    /// Principal debited by this movement.
    pub fn source_principal(self, user_id: i64) -> i64 {
        match self {
            TransactionType::Topup => SystemKind::Treasury.principal_id(),
            TransactionType::Bonus => SystemKind::Marketing.principal_id(),
            TransactionType::Spend => user_id,
        }
    }

    /// Principal credited by this movement.
    pub fn destination_principal(self, user_id: i64) -> i64 {
        match self {
            TransactionType::Topup | TransactionType::Bonus => user_id,
            TransactionType::Spend => SystemKind::Revenue.principal_id(),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TOPUP" => Ok(TransactionType::Topup),
            "BONUS" => Ok(TransactionType::Bonus),
            "SPEND" => Ok(TransactionType::Spend),
            other => Err(format!("unknown transaction type: {other}")),
        }
    }
}

impl TryFrom<String> for TransactionType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Lifecycle: PENDING is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Failed => "FAILED",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for TransactionStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "PENDING" => Ok(TransactionStatus::Pending),
            "COMPLETED" => Ok(TransactionStatus::Completed),
            "FAILED" => Ok(TransactionStatus::Failed),
            other => Err(format!("unknown transaction status: {other}")),
        }
    }
}

/// A persisted movement record.
#[derive(Debug, Clone, FromRow)]
pub struct Transaction {
    pub id: i64,
    /// Opaque id returned to callers.
    pub public_id: Uuid,
    pub idempotency_key: String,
    #[sqlx(try_from = "String")]
    pub transaction_type: TransactionType,
    pub user_id: i64,
    pub asset_type_id: i32,
    pub amount: Money,
    #[sqlx(try_from = "String")]
    pub status: TransactionStatus,
    pub metadata: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A typed movement request as handed to the engine.
#[derive(Debug, Clone)]
pub struct MovementRequest {
    pub idempotency_key: String,
    pub transaction_type: TransactionType,
    pub user_id: i64,
    /// Asset code (e.g. "COIN"); resolved to an id at the engine edge.
    pub asset_type: String,
    pub amount: Money,
    pub metadata: Option<serde_json::Value>,
}

impl MovementRequest {
    /// Shape validation, run before any DB transaction opens.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.idempotency_key.is_empty() {
            return Err(EngineError::Validation(
                "idempotency_key must not be empty".to_string(),
            ));
        }
        if self.idempotency_key.len() > 100 {
            return Err(EngineError::Validation(
                "idempotency_key exceeds 100 characters".to_string(),
            ));
        }
        if self.user_id <= 0 {
            return Err(EngineError::Validation(
                "user_id must be a positive user principal".to_string(),
            ));
        }
        if self.asset_type.is_empty() {
            return Err(EngineError::Validation(
                "asset_type must not be empty".to_string(),
            ));
        }
        if !self.amount.is_positive() {
            return Err(EngineError::Validation(
                "amount must be strictly positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: &str) -> MovementRequest {
        MovementRequest {
            idempotency_key: "k1".to_string(),
            transaction_type: TransactionType::Topup,
            user_id: 7,
            asset_type: "COIN".to_string(),
            amount: amount.parse().unwrap(),
            metadata: None,
        }
    }

    #[test]
    fn test_movement_table_topup() {
        assert_eq!(TransactionType::Topup.source_principal(7), -1);
        assert_eq!(TransactionType::Topup.destination_principal(7), 7);
    }

    #[test]
    fn test_movement_table_bonus() {
        assert_eq!(TransactionType::Bonus.source_principal(7), -2);
        assert_eq!(TransactionType::Bonus.destination_principal(7), 7);
    }

    #[test]
    fn test_movement_table_spend() {
        assert_eq!(TransactionType::Spend.source_principal(7), 7);
        assert_eq!(TransactionType::Spend.destination_principal(7), -3);
    }

    #[test]
    fn test_type_string_round_trip() {
        for t in [
            TransactionType::Topup,
            TransactionType::Bonus,
            TransactionType::Spend,
        ] {
            assert_eq!(t.as_str().parse::<TransactionType>().unwrap(), t);
        }
        assert!("TRANSFER".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_status_terminality() {
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(TransactionStatus::Completed.is_terminal());
        assert!(TransactionStatus::Failed.is_terminal());
    }

    #[test]
    fn test_validate_accepts_well_formed_request() {
        assert!(request("100.00000000").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_amount() {
        assert!(matches!(
            request("0").validate(),
            Err(EngineError::Validation(_))
        ));
        assert!(matches!(
            request("-1").validate(),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_user_and_key() {
        let mut req = request("1");
        req.user_id = 0;
        assert!(matches!(req.validate(), Err(EngineError::Validation(_))));

        let mut req = request("1");
        req.user_id = -1;
        assert!(matches!(req.validate(), Err(EngineError::Validation(_))));

        let mut req = request("1");
        req.idempotency_key = String::new();
        assert!(matches!(req.validate(), Err(EngineError::Validation(_))));

        let mut req = request("1");
        req.idempotency_key = "k".repeat(101);
        assert!(matches!(req.validate(), Err(EngineError::Validation(_))));

        let mut req = request("1");
        req.asset_type = String::new();
        assert!(matches!(req.validate(), Err(EngineError::Validation(_))));
    }
}
