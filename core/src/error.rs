//! Error types for the request core.
//!
//! # Design
//! Building a request and performing it fail in different ways and are kept
//! apart: `Build` means the assembled method/URI/headers were rejected before
//! anything left the process, `Transport` means the round-trip itself failed.
//! A non-2xx response is not an error here; it comes back as a normal
//! `Response`. `Status` exists only for callers who opt in through
//! `Response::error_for_status`.

use http::StatusCode;
use thiserror::Error;

use crate::http::TransportError;

#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be assembled (invalid URI, header value, ...).
    #[error("failed to build request: {0}")]
    Build(#[from] http::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Reading the response body failed.
    #[error("failed to read body: {0}")]
    Io(#[from] std::io::Error),

    /// A body could not be encoded to or decoded from JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl Error {
    pub fn is_build(&self) -> bool {
        matches!(self, Error::Build(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
