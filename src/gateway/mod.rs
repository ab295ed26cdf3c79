//! HTTP gateway: a thin adapter over the transaction engine.

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;

use crate::config::GatewayConfig;
use state::AppState;

/// Start the HTTP gateway server.
pub async fn run_server(config: &GatewayConfig, state: Arc<AppState>) -> anyhow::Result<()> {
    let transaction_routes = Router::new()
        .route("/topup", post(handlers::topup))
        .route("/bonus", post(handlers::bonus))
        .route("/spend", post(handlers::spend));

    let wallet_routes = Router::new().route("/{user_id}/balance", get(handlers::get_wallet_balance));

    let app = Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/api/v1/openapi.json",
            get(|| async { Json(openapi::ApiDoc::openapi()) }),
        )
        .nest("/api/v1/transactions", transaction_routes)
        .nest("/api/v1/wallets", wallet_routes)
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("HTTP gateway listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
