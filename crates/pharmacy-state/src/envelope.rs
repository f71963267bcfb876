//! # Response Envelope
//!
//! The backend wraps every payload as `{ "data": ..., "message": ... }`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// A decoded REST response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,

    /// Status text meant for a toast, when the backend sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

impl<T> ApiEnvelope<T> {
    /// Unwraps the payload. A body flagged `"success": false` is a failure
    /// reported by the backend and carries its message.
    pub fn into_data(self) -> ApiResult<T> {
        match self.success {
            Some(false) => {
                let message = self
                    .message
                    .unwrap_or_else(|| "Request failed on the server".to_string());
                tracing::warn!(message = %message, "Backend reported failure");
                Err(ApiError::internal(message))
            }
            _ => Ok(self.data),
        }
    }
}

/// Decodes a response body into its envelope.
///
/// ## Example
/// ```rust
/// use pharmacy_core::InventoryLot;
/// use pharmacy_state::decode_envelope;
///
/// let body = r#"{ "data": [{ "medicineId": "M1", "batchNumber": "B1" }], "message": "ok" }"#;
/// let envelope = decode_envelope::<Vec<InventoryLot>>(body).unwrap();
/// assert_eq!(envelope.data[0].batch_number.as_deref(), Some("B1"));
/// ```
pub fn decode_envelope<T: DeserializeOwned>(body: &str) -> ApiResult<ApiEnvelope<T>> {
    Ok(serde_json::from_str(body)?)
}
