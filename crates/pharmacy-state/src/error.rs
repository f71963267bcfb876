//! # API Error Type
//!
//! Unified error type handed to the presentation layer.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Dashboard                          │
//! │                                                                         │
//! │  REST body ──► decode_envelope ── serde_json::Error ──┐                │
//! │                                                       │                │
//! │  State call ──► pharmacy-core                         │                │
//! │                   ├── ValidationError ────────────────┼──► ApiError ──►│
//! │                   └── CoreError ──────────────────────┘                │
//! │                                                                         │
//! │  Dashboard receives { "code": "VALIDATION_ERROR",                       │
//! │                       "message": "batch number is required" }           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pharmacy_core::{CoreError, ValidationError};
use serde::Serialize;
use thiserror::Error;

/// Error returned from every fallible state operation.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Medicine not found: M1"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Resource not found (404)
    NotFound,

    /// Cart operation failed
    CartError,

    /// A REST body could not be decoded
    DecodeError,

    /// The backend reported a failure (`"success": false`)
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MedicineNotFound(id) => ApiError::not_found("Medicine", &id),
            CoreError::EmptyCart => ApiError::cart("Cart is empty"),
            CoreError::Validation(e) => e.into(),
        }
    }
}

/// Body decoding failures. The serde message is kept in the log only.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::warn!(error = %err, "Failed to decode response body");
        ApiError::new(ErrorCode::DecodeError, "Malformed response from server")
    }
}

/// Convenience alias for state operations.
pub type ApiResult<T> = Result<T, ApiError>;
