//! Data models for ledger entries.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryType {
    Debit,
    Credit,
}

impl EntryType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryType::Debit => "DEBIT",
            EntryType::Credit => "CREDIT",
        }
    }

    /// Sign convention for audit sums: credits count positive, debits
    /// negative, so the two legs of a movement cancel to zero.
    pub fn sign(self) -> i32 {
        match self {
            EntryType::Debit => -1,
            EntryType::Credit => 1,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for EntryType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "DEBIT" => Ok(EntryType::Debit),
            "CREDIT" => Ok(EntryType::Credit),
            other => Err(format!("unknown entry type: {other}")),
        }
    }
}

/// One leg of a double-entry posting. Every COMPLETED transaction carries
/// exactly one DEBIT and one CREDIT of identical amount.
#[derive(Debug, Clone, FromRow)]
pub struct LedgerEntry {
    pub id: i64,
    pub transaction_public_id: Uuid,
    pub wallet_id: i64,
    #[sqlx(try_from = "String")]
    pub entry_type: EntryType,
    /// Positive magnitude; direction lives in `entry_type`.
    pub amount: Money,
    pub balance_before: Money,
    pub balance_after: Money,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signs_cancel() {
        assert_eq!(EntryType::Debit.sign() + EntryType::Credit.sign(), 0);
    }

    #[test]
    fn test_entry_type_round_trip() {
        assert_eq!(EntryType::try_from("DEBIT".to_string()), Ok(EntryType::Debit));
        assert_eq!(
            EntryType::try_from("CREDIT".to_string()),
            Ok(EntryType::Credit)
        );
        assert!(EntryType::try_from("TRANSFER".to_string()).is_err());
    }
}
