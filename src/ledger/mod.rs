//! Ledger store: append-only double-entry postings.

pub mod models;
pub mod repository;

pub use models::{EntryType, LedgerEntry};
pub use repository::LedgerRepository;
