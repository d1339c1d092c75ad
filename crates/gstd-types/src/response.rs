//! The response envelope written by the daemon.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ReturnCode;

/// Single response sent for every request.
///
/// Serialised as `{"code": 0, "description": "Success", "response": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Outcome of the operation.
    pub code: ReturnCode,
    /// Text explaining the outcome.
    pub description: String,
    /// Payload produced by reads; `null` otherwise.
    #[serde(default)]
    pub response: Value,
}

impl Response {
    /// Builds a successful response carrying `payload`.
    #[must_use]
    pub fn success(payload: Value) -> Self {
        Self {
            code: ReturnCode::Ok,
            description: ReturnCode::Ok.description().to_owned(),
            response: payload,
        }
    }

    /// Builds a failed response with a detail message.
    #[must_use]
    pub fn failure(code: ReturnCode, detail: &str) -> Self {
        let description = if detail.is_empty() {
            code.description().to_owned()
        } else {
            format!("{}: {detail}", code.description())
        };
        Self {
            code,
            description,
            response: Value::Null,
        }
    }
}
