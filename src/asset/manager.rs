//! Asset manager for loading and querying asset types.

use sqlx::PgPool;

use super::models::AssetType;

pub struct AssetManager;

impl AssetManager {
    /// Load all active asset types.
    pub async fn load_active(pool: &PgPool) -> Result<Vec<AssetType>, sqlx::Error> {
        let rows: Vec<AssetType> = sqlx::query_as(
            r#"SELECT id, code, display_name, is_active, created_at, updated_at
               FROM asset_types WHERE is_active ORDER BY id"#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Get an asset type by id.
    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<AssetType>, sqlx::Error> {
        let row: Option<AssetType> = sqlx::query_as(
            r#"SELECT id, code, display_name, is_active, created_at, updated_at
               FROM asset_types WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    /// Get an active asset type by code (e.g. "COIN").
    pub async fn get_active_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<AssetType>, sqlx::Error> {
        let row: Option<AssetType> = sqlx::query_as(
            r#"SELECT id, code, display_name, is_active, created_at, updated_at
               FROM asset_types WHERE code = $1 AND is_active"#,
        )
        .bind(code)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }
}
