//! Data models for wallets.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::money::Money;

/// System principals own the source/sink wallets. Negative ids keep them
/// disjoint from user ids under the same (principal_id, asset_type_id)
/// unique index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SystemKind {
    Treasury,
    Marketing,
    Revenue,
}

impl SystemKind {
    pub const ALL: [SystemKind; 3] = [
        SystemKind::Treasury,
        SystemKind::Marketing,
        SystemKind::Revenue,
    ];

    pub fn principal_id(self) -> i64 {
        match self {
            SystemKind::Treasury => -1,
            SystemKind::Marketing => -2,
            SystemKind::Revenue => -3,
        }
    }

    pub fn from_principal(principal_id: i64) -> Option<Self> {
        match principal_id {
            -1 => Some(SystemKind::Treasury),
            -2 => Some(SystemKind::Marketing),
            -3 => Some(SystemKind::Revenue),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SystemKind::Treasury => "TREASURY",
            SystemKind::Marketing => "MARKETING",
            SystemKind::Revenue => "REVENUE",
        }
    }
}

/// An account holding a non-negative balance of one asset for one principal.
///
/// User wallets are created lazily on first movement; system wallets are
/// seeded. Wallets are never deleted.
#[derive(Debug, Clone, FromRow)]
pub struct Wallet {
    pub id: i64,
    /// Positive for users, negative for system principals.
    pub principal_id: i64,
    pub asset_type_id: i32,
    pub balance: Money,
    pub is_system: bool,
    pub system_kind: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_kind_principal_mapping() {
        for kind in SystemKind::ALL {
            assert_eq!(SystemKind::from_principal(kind.principal_id()), Some(kind));
            assert!(kind.principal_id() < 0);
        }
    }

    #[test]
    fn test_user_principals_are_not_system() {
        assert_eq!(SystemKind::from_principal(1), None);
        assert_eq!(SystemKind::from_principal(0), None);
        assert_eq!(SystemKind::from_principal(-4), None);
    }
}
