//! Wallet store: lookup, lazy creation, row locking, balance deltas.

pub mod models;
pub mod repository;

pub use models::{SystemKind, Wallet};
pub use repository::{WalletError, WalletRepository};
