pub mod health;
pub mod transactions;
pub mod wallet;

pub use health::health_check;
pub use transactions::{bonus, spend, topup};
pub use wallet::get_wallet_balance;
