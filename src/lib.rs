//! coinledger - Closed-Loop Virtual Currency Ledger
//!
//! Records monetary movements between user-owned and system-owned wallets
//! under concurrent load: no wallet ever goes negative, every movement is
//! auditable through double-entry bookkeeping, every submission is
//! exactly-once per idempotency key, and concurrent movements on
//! overlapping wallets serialize without deadlock.
//!
//! # Modules
//!
//! - [`money`] - Fixed-point decimal amounts (20.8)
//! - [`asset`] - Asset type catalog
//! - [`wallet`] - Wallet store with row locking
//! - [`transaction`] - Transaction records keyed by idempotency
//! - [`ledger`] - Append-only double-entry postings
//! - [`engine`] - The transaction-processing engine
//! - [`schema`] - Schema bootstrap and seeding
//! - [`gateway`] - HTTP adapter
//! - [`config`] - Service configuration

// Core types - must be first!
pub mod money;

// Configuration
pub mod config;

// Ledger components
pub mod asset;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod schema;
pub mod transaction;
pub mod wallet;

// Infrastructure
pub mod db;
pub mod gateway;
pub mod logging;

// Convenient re-exports at crate root
pub use db::Database;
pub use engine::{EngineSettings, TransactionEngine};
pub use error::EngineError;
pub use money::Money;
pub use transaction::{MovementRequest, Transaction, TransactionStatus, TransactionType};
pub use wallet::{SystemKind, Wallet};
