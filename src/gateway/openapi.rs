//! OpenAPI document for the gateway.

use utoipa::OpenApi;

use super::handlers;
use super::types::{MovementBody, TransactionResponse, WalletBalanceResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "coinledger",
        description = "Closed-loop virtual currency ledger with double-entry bookkeeping"
    ),
    paths(
        handlers::transactions::topup,
        handlers::transactions::bonus,
        handlers::transactions::spend,
        handlers::wallet::get_wallet_balance,
        handlers::health::health_check,
    ),
    components(schemas(
        MovementBody,
        TransactionResponse,
        WalletBalanceResponse,
        handlers::health::HealthResponse,
    )),
    tags(
        (name = "Transactions", description = "Movement processing"),
        (name = "Wallets", description = "Balance lookups"),
        (name = "System", description = "Service health")
    )
)]
pub struct ApiDoc;
