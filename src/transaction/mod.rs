//! Transaction store: movement records keyed by idempotency.

pub mod models;
pub mod repository;

pub use models::{MovementRequest, Transaction, TransactionStatus, TransactionType};
pub use repository::{TransactionRepository, TransactionStoreError};
