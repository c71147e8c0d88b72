//! Endpoint definitions.
//!
//! Each endpoint is a plain struct: required path parameters go through
//! `new`, everything else through chainable setters. `Endpoint::build` turns
//! it into an `http::Request`, `Endpoint::send` performs it.
//!
//! These files follow one fixed shape so that further endpoints can be added
//! from the published API table without touching the request core.

mod bulk;
mod cluster;
mod document;
mod indices;
mod search;

pub use bulk::Bulk;
pub use cluster::{ClusterHealth, Info, Ping};
pub use document::{Delete, Exists, Get, Index};
pub use indices::{GetTemplate, PutTemplate};
pub use search::Search;

/// Type segment used when none is given.
pub(crate) const DEFAULT_DOC_TYPE: &str = "_doc";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    True,
    False,
    WaitFor,
}

impl Refresh {
    pub fn as_str(&self) -> &'static str {
        match self {
            Refresh::True => "true",
            Refresh::False => "false",
            Refresh::WaitFor => "wait_for",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionType {
    Internal,
    External,
    ExternalGte,
}

impl VersionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionType::Internal => "internal",
            VersionType::External => "external",
            VersionType::ExternalGte => "external_gte",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpType {
    Index,
    Create,
}

impl OpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpType::Index => "index",
            OpType::Create => "create",
        }
    }
}
