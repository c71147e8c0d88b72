//! Response DTOs for common API shapes.
//!
//! # Design
//! These cover the handful of responses callers decode most often. They are
//! plain serde types and are meant to be used with `Response::json`; nothing
//! in the request path depends on them.

use serde::{Deserialize, Serialize};

/// `GET /{index}/_doc/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetDocument<T> {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    pub found: bool,
    #[serde(rename = "_source", default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub source: Option<T>,
}

/// Result of an index or delete call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WriteResult {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version")]
    pub version: u64,
    pub result: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult<T> {
    pub took: u64,
    pub timed_out: bool,
    pub hits: Hits<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hits<T> {
    pub total: TotalHits,
    pub hits: Vec<Hit<T>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TotalHits {
    pub value: u64,
    pub relation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hit<T> {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source")]
    pub source: T,
}

/// `POST /_bulk`. Items are left untyped; each one is keyed by its action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkResult {
    pub took: u64,
    pub errors: bool,
    pub items: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterHealth {
    pub cluster_name: String,
    pub status: String,
    pub timed_out: bool,
    pub number_of_nodes: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Acknowledged {
    pub acknowledged: bool,
}

/// `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterInfo {
    pub name: String,
    pub cluster_name: String,
    pub version: VersionInfo,
    pub tagline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionInfo {
    pub number: String,
    #[serde(default)]
    pub distribution: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Product {
        name: String,
    }

    #[test]
    fn get_document_found() {
        let doc: GetDocument<Product> = serde_json::from_str(
            r#"{"_index":"products","_id":"42","_version":3,"found":true,"_source":{"name":"lamp"}}"#,
        )
        .unwrap();
        assert!(doc.found);
        assert_eq!(doc.version, Some(3));
        assert_eq!(doc.source, Some(Product { name: "lamp".into() }));
    }

    #[test]
    fn get_document_missing_has_no_source() {
        let doc: GetDocument<Product> =
            serde_json::from_str(r#"{"_index":"products","_id":"7","found":false}"#).unwrap();
        assert!(!doc.found);
        assert!(doc.source.is_none());
        assert!(doc.version.is_none());
    }

    #[test]
    fn search_result_parses_hits() {
        let result: SearchResult<Product> = serde_json::from_str(
            r#"{"took":2,"timed_out":false,"hits":{"total":{"value":1,"relation":"eq"},
                "hits":[{"_index":"products","_id":"1","_source":{"name":"desk"}}]}}"#,
        )
        .unwrap();
        assert_eq!(result.hits.total.value, 1);
        assert_eq!(result.hits.hits[0].source.name, "desk");
    }
}
