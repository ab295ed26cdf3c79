//! Movement handlers (topup, bonus, spend).
//!
//! Thin adapter: each handler translates the body into a typed engine
//! request and the engine outcome into a response. All business rules live
//! in the engine.

use std::sync::Arc;

use axum::{Json, extract::State};

use super::super::state::AppState;
use super::super::types::{ApiError, MovementBody, TransactionResponse};
use crate::transaction::TransactionType;

/// Process a TOPUP movement.
///
/// User purchases coins from the treasury.
#[utoipa::path(
    post,
    path = "/api/v1/transactions/topup",
    request_body = MovementBody,
    responses(
        (status = 200, description = "Completed or replayed transaction", body = TransactionResponse, content_type = "application/json"),
        (status = 422, description = "Request shape invalid"),
        (status = 400, description = "Unknown asset or configuration error")
    ),
    tag = "Transactions"
)]
pub async fn topup(
    State(state): State<Arc<AppState>>,
    Json(body): Json<MovementBody>,
) -> Result<Json<TransactionResponse>, ApiError> {
    process(&state, body, TransactionType::Topup).await
}

/// Process a BONUS movement.
///
/// Marketing grants bonus coins to a user.
#[utoipa::path(
    post,
    path = "/api/v1/transactions/bonus",
    request_body = MovementBody,
    responses(
        (status = 200, description = "Completed or replayed transaction", body = TransactionResponse, content_type = "application/json"),
        (status = 422, description = "Request shape invalid"),
        (status = 400, description = "Unknown asset or configuration error")
    ),
    tag = "Transactions"
)]
pub async fn bonus(
    State(state): State<Arc<AppState>>,
    Json(body): Json<MovementBody>,
) -> Result<Json<TransactionResponse>, ApiError> {
    process(&state, body, TransactionType::Bonus).await
}

/// Process a SPEND movement.
///
/// User spends coins into the revenue wallet.
#[utoipa::path(
    post,
    path = "/api/v1/transactions/spend",
    request_body = MovementBody,
    responses(
        (status = 200, description = "Completed or replayed transaction", body = TransactionResponse, content_type = "application/json"),
        (status = 422, description = "Request shape invalid"),
        (status = 400, description = "Insufficient funds or unknown asset")
    ),
    tag = "Transactions"
)]
pub async fn spend(
    State(state): State<Arc<AppState>>,
    Json(body): Json<MovementBody>,
) -> Result<Json<TransactionResponse>, ApiError> {
    process(&state, body, TransactionType::Spend).await
}

async fn process(
    state: &AppState,
    body: MovementBody,
    transaction_type: TransactionType,
) -> Result<Json<TransactionResponse>, ApiError> {
    let request = body.into_request(transaction_type);
    let transaction = state.engine.process(request).await?;
    Ok(Json(TransactionResponse::from(transaction)))
}
