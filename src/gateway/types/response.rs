//! API error envelope and error codes.
//!
//! Successful movement and balance responses return their DTOs bare; errors
//! share one `{code, msg}` envelope with stable numeric codes.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::EngineError;

/// Error response wrapper.
///
/// - code: non-zero error code (see [`error_codes`])
/// - msg: short message description
/// - data: reserved, always null for errors
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    #[schema(example = 1002)]
    pub code: i32,
    #[schema(example = "insufficient funds")]
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl ApiResponse<()> {
    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

/// Unified API error with automatic `IntoResponse`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// 422 Unprocessable Entity for request-shape validation failures.
    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            error_codes::VALIDATION_ERROR,
            msg,
        )
    }

    /// 400 Bad Request for business-rule failures.
    pub fn bad_request(code: i32, msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, msg)
    }

    /// 404 Not Found.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error_codes::WALLET_NOT_FOUND, msg)
    }

    /// 500 Internal Server Error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            msg,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(ApiResponse::<()>::error(self.code, self.message));
        (self.status, body).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            // Unknown/inactive asset answers 400 like the other business
            // rules; the remaining validation failures answer 422.
            EngineError::Validation(msg) => {
                if msg.starts_with("unknown or inactive asset type") {
                    ApiError::bad_request(error_codes::INVALID_ASSET, msg)
                } else {
                    ApiError::unprocessable(msg)
                }
            }
            EngineError::InsufficientFunds { balance, required } => ApiError::bad_request(
                error_codes::INSUFFICIENT_FUNDS,
                format!("insufficient funds: balance {balance}, required {required}"),
            ),
            EngineError::Configuration(msg) => {
                tracing::error!("configuration error: {msg}");
                ApiError::bad_request(error_codes::CONFIGURATION_ERROR, msg)
            }
            // The engine resolves duplicates by returning the existing row;
            // this only surfaces if a key stays contended past all retries.
            EngineError::DuplicateIdempotencyKey => ApiError::new(
                StatusCode::CONFLICT,
                error_codes::DUPLICATE_TRANSACTION,
                "transaction with this idempotency key already exists",
            ),
            EngineError::Storage(e) => {
                tracing::error!("storage error: {e}");
                ApiError::internal("a database error occurred")
            }
            EngineError::Timeout => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::TIMEOUT,
                "deadline exceeded before commit",
            ),
        }
    }
}

/// Standard API error codes.
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const VALIDATION_ERROR: i32 = 1001;
    pub const INSUFFICIENT_FUNDS: i32 = 1002;
    pub const INVALID_ASSET: i32 = 1003;
    pub const CONFIGURATION_ERROR: i32 = 1004;

    // Resource errors (4xxx)
    pub const WALLET_NOT_FOUND: i32 = 4001;
    pub const DUPLICATE_TRANSACTION: i32 = 4091;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const TIMEOUT: i32 = 5004;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    #[test]
    fn test_validation_maps_to_422() {
        let err: ApiError = EngineError::Validation("amount must be positive".to_string()).into();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code, error_codes::VALIDATION_ERROR);
    }

    #[test]
    fn test_unknown_asset_validation_maps_to_400() {
        let err: ApiError =
            EngineError::Validation("unknown or inactive asset type: SHELL".to_string()).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, error_codes::INVALID_ASSET);
        assert!(err.message.contains("SHELL"));
    }

    #[test]
    fn test_business_rules_map_to_400() {
        let err: ApiError = EngineError::InsufficientFunds {
            balance: Money::ZERO,
            required: "0.00000001".parse().unwrap(),
        }
        .into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, error_codes::INSUFFICIENT_FUNDS);
        assert!(err.message.contains("0.00000001"));

        let err: ApiError = EngineError::Configuration("missing wallet".to_string()).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_maps_to_500_without_details() {
        let err: ApiError = EngineError::Storage(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "a database error occurred");
    }

    #[test]
    fn test_duplicate_maps_to_409() {
        let err: ApiError = EngineError::DuplicateIdempotencyKey.into();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.code, error_codes::DUPLICATE_TRANSACTION);
    }
}
