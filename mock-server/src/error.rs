use std::fmt;

use axum::http::StatusCode;
use serde_json::{json, Value};

/// An error rendered the way OpenSearch reports failures:
/// `{"error":{"root_cause":[..],"type":..,"reason":..},"status":..}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    reason: String,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: &'static str, reason: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            reason: reason.into(),
        }
    }

    pub fn index_not_found(index: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "index_not_found_exception",
            format!("no such index [{index}]"),
        )
    }

    pub fn version_conflict(id: &str, version: u64) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            "version_conflict_engine_exception",
            format!("[{id}]: version conflict, document already exists (current version [{version}])"),
        )
    }

    pub fn parse(reason: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "parse_exception", reason)
    }

    pub fn validation(reason: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "action_request_validation_exception",
            format!("Validation Failed: 1: {reason};"),
        )
    }

    pub fn illegal_argument(reason: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "illegal_argument_exception", reason)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// The `{"type","reason"}` object used both as root cause and as a
    /// per-item bulk error.
    pub fn cause(&self) -> Value {
        json!({ "type": self.kind, "reason": self.reason })
    }

    pub fn body(&self) -> Value {
        json!({
            "error": {
                "root_cause": [self.cause()],
                "type": self.kind,
                "reason": self.reason,
            },
            "status": self.status.as_u16(),
        })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.reason)
    }
}

impl std::error::Error for ApiError {}
