//! Request-building core for the OpenSearch REST API.
//!
//! # Overview
//! Builds `http::Request` values for OpenSearch endpoints and wraps the
//! `http::Response` that comes back, without touching the network itself.
//! A [`Transport`] supplied by the caller performs the round-trip, so the
//! core is deterministic and testable against a closure or a mock server.
//!
//! # Design
//! - Every endpoint is a plain struct with chainable setters. Unset optional
//!   parameters are omitted from the query string entirely.
//! - Shared options (`pretty`, `human`, `error_trace`, `filter_path`, extra
//!   headers, `X-Opaque-Id`, cancellation) come from [`CommonParams`].
//! - Building never performs I/O and sending never retries. Connection
//!   pooling, base URL and retries belong to the transport.
//! - Non-2xx responses are returned as `Ok`; inspect
//!   [`Response::is_error`] or call [`Response::error_for_status`].
//!
//! ```
//! use osapi_core::prelude::*;
//! use osapi_core::api::Get;
//!
//! let req = Get::new("products", "42").pretty().build().unwrap();
//! assert_eq!(req.uri().path(), "/products/_doc/42");
//! assert_eq!(req.uri().query(), Some("pretty=true"));
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod params;
pub mod path;
pub mod request;
pub mod response;
pub mod types;

pub use crate::api::{OpType, Refresh, VersionType};
pub use crate::client::Client;
pub use crate::error::{Error, Result};
pub use crate::http::{Body, Transport, TransportError, TransportFn};
pub use crate::params::{format_duration, QueryParams};
pub use crate::path::PathBuilder;
pub use crate::request::{CommonOptions, CommonParams, Endpoint, RequestBuilder};
pub use crate::response::Response;

pub mod prelude {
    pub use crate::http::Transport;
    pub use crate::request::{CommonParams, Endpoint};
}
