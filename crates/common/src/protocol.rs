//! Request and response types exchanged over the public HTTP API.

use serde::{Deserialize, Serialize};

use crate::session::SessionState;

/// A flat document record: field name → JSON value.
///
/// Built by the caller immediately before a storage write or immediately after
/// a storage read; never retained by the service.
pub type Record = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Record endpoints
// ---------------------------------------------------------------------------

/// Request body for `POST /records/encrypt` and `POST /records/decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldsRequest {
    /// The record to transform.
    pub record: Record,
    /// Names of the sensitive top-level fields.
    #[serde(default)]
    pub fields: Vec<String>,
}

/// Successful response body for the record endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResponse {
    /// Shallow copy of the input record with the named fields transformed.
    pub record: Record,
}

// ---------------------------------------------------------------------------
// Session endpoints
// ---------------------------------------------------------------------------

/// Response body for the `/session` endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Current session state.
    #[serde(flatten)]
    pub state: SessionState,
    /// User-facing failure message, present only for failed sessions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<SessionState> for SessionResponse {
    fn from(state: SessionState) -> Self {
        let message = match &state {
            SessionState::Failed { category } => Some(category.user_message().to_owned()),
            _ => None,
        };
        Self { state, message }
    }
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Error body returned by every handler failure and the 404 fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"` or `"degraded"`.
    pub status: String,
    /// Where the field encryption passphrase came from.
    pub key_source: String,
    /// Whether the identity-provider session listener is registered.
    pub session_listener: bool,
}
