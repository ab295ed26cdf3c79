use std::sync::Arc;

use crate::db::Database;
use crate::engine::TransactionEngine;

/// Shared gateway state.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<TransactionEngine>,
    pub db: Arc<Database>,
}

impl AppState {
    pub fn new(engine: Arc<TransactionEngine>, db: Arc<Database>) -> Self {
        Self { engine, db }
    }
}
