//! Data models for the asset catalog.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// An enumerated currency kind (COIN, GEM, GOLD).
///
/// Seeded administratively; the engine treats rows as immutable.
#[derive(Debug, Clone, FromRow)]
pub struct AssetType {
    pub id: i32,
    /// Short upper-case code, e.g. "COIN".
    pub code: String,
    pub display_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
