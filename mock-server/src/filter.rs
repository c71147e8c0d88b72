//! Response filtering for `?filter_path`.
//!
//! Each comma-separated entry is a dotted path into the response. `*` matches
//! any key at its level, and a path that reaches an array applies to every
//! element, so `hits.hits._id` keeps just the ids of the hits.

use serde_json::{Map, Value};

pub fn filter_path(value: Value, filter: &str) -> Value {
    let paths: Vec<Vec<&str>> = filter
        .split(',')
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(|path| path.split('.').collect())
        .collect();
    if paths.is_empty() {
        return value;
    }
    keep(&value, &paths).unwrap_or_else(|| Value::Object(Map::new()))
}

fn keep(value: &Value, paths: &[Vec<&str>]) -> Option<Value> {
    if paths.iter().any(Vec::is_empty) {
        return Some(value.clone());
    }
    match value {
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, child) in map {
                let rest: Vec<Vec<&str>> = paths
                    .iter()
                    .filter(|path| path[0] == "*" || path[0] == key.as_str())
                    .map(|path| path[1..].to_vec())
                    .collect();
                if rest.is_empty() {
                    continue;
                }
                if let Some(kept) = keep(child, &rest) {
                    out.insert(key.clone(), kept);
                }
            }
            (!out.is_empty()).then_some(Value::Object(out))
        }
        Value::Array(items) => {
            let kept: Vec<Value> = items.iter().filter_map(|item| keep(item, paths)).collect();
            (!kept.is_empty()).then_some(Value::Array(kept))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn info() -> Value {
        json!({
            "name": "mock-node-1",
            "cluster_name": "mock-cluster",
            "version": { "number": "2.11.0", "distribution": "opensearch" },
        })
    }

    #[test]
    fn keeps_named_fields() {
        let filtered = filter_path(info(), "name,version.number");
        assert_eq!(
            filtered,
            json!({ "name": "mock-node-1", "version": { "number": "2.11.0" } })
        );
    }

    #[test]
    fn wildcard_matches_any_key() {
        let filtered = filter_path(info(), "*.distribution");
        assert_eq!(filtered, json!({ "version": { "distribution": "opensearch" } }));
    }

    #[test]
    fn paths_reach_into_arrays() {
        let body = json!({
            "took": 1,
            "hits": { "hits": [ { "_id": "1", "_score": 1.0 }, { "_id": "2", "_score": 1.0 } ] },
        });
        let filtered = filter_path(body, "hits.hits._id");
        assert_eq!(filtered, json!({ "hits": { "hits": [ { "_id": "1" }, { "_id": "2" } ] } }));
    }

    #[test]
    fn no_match_is_an_empty_object() {
        assert_eq!(filter_path(info(), "missing"), json!({}));
    }

    #[test]
    fn blank_filter_keeps_everything() {
        assert_eq!(filter_path(info(), ""), info());
        assert_eq!(filter_path(info(), ","), info());
    }
}
