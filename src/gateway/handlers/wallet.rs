//! Wallet balance handler.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::super::state::AppState;
use super::super::types::{ApiError, WalletBalanceResponse};

#[derive(Debug, Deserialize, IntoParams)]
pub struct BalanceParams {
    /// Asset type ID
    pub asset_type_id: i32,
}

/// Get wallet balance for a specific user and asset type.
#[utoipa::path(
    get,
    path = "/api/v1/wallets/{user_id}/balance",
    params(
        ("user_id" = i64, Path, description = "User principal id"),
        BalanceParams
    ),
    responses(
        (status = 200, description = "Balance details", body = WalletBalanceResponse, content_type = "application/json"),
        (status = 404, description = "Wallet not found")
    ),
    tag = "Wallets"
)]
pub async fn get_wallet_balance(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Query(params): Query<BalanceParams>,
) -> Result<Json<WalletBalanceResponse>, ApiError> {
    let balance = state
        .engine
        .get_balance(user_id, params.asset_type_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!(
                "Wallet not found for user {} and asset_type {}",
                user_id, params.asset_type_id
            ))
        })?;

    Ok(Json(WalletBalanceResponse::from(balance)))
}
