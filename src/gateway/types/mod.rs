pub mod dto;
pub mod response;

pub use dto::{MovementBody, TransactionResponse, WalletBalanceResponse};
pub use response::{ApiError, ApiResponse, error_codes};
