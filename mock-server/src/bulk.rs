//! Newline-delimited `_bulk` bodies.

use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::store::{generate_id, Store};

#[derive(Debug, Clone, PartialEq)]
pub enum BulkOp {
    Index {
        index: String,
        id: Option<String>,
        source: Value,
    },
    Create {
        index: String,
        id: Option<String>,
        source: Value,
    },
    Delete {
        index: String,
        id: String,
    },
}

/// Parse every action up front so a malformed body is rejected before
/// anything is written.
pub fn parse(body: &str, default_index: Option<&str>) -> Result<Vec<BulkOp>, ApiError> {
    let mut lines = body.lines().map(str::trim).filter(|line| !line.is_empty());
    let mut ops = Vec::new();
    while let Some(line) = lines.next() {
        let action: Value = serde_json::from_str(line)
            .map_err(|err| ApiError::parse(format!("Malformed action/metadata line: {err}")))?;
        let Some((name, meta)) = action
            .as_object()
            .filter(|action| action.len() == 1)
            .and_then(|action| action.iter().next())
        else {
            return Err(ApiError::illegal_argument(
                "Malformed action/metadata line, expected a single action",
            ));
        };
        let index = meta
            .get("_index")
            .and_then(Value::as_str)
            .or(default_index)
            .ok_or_else(|| ApiError::validation("index is missing"))?
            .to_string();
        let id = meta.get("_id").and_then(Value::as_str).map(str::to_string);

        let op = match name.as_str() {
            "index" | "create" => {
                let source = lines
                    .next()
                    .ok_or_else(|| ApiError::parse(format!("missing source for [{name}] action")))?;
                let source = serde_json::from_str(source)
                    .map_err(|err| ApiError::parse(format!("failed to parse source: {err}")))?;
                if name == "index" {
                    BulkOp::Index { index, id, source }
                } else {
                    BulkOp::Create { index, id, source }
                }
            }
            "delete" => BulkOp::Delete {
                index,
                id: id.ok_or_else(|| ApiError::validation("id is missing"))?,
            },
            other => {
                return Err(ApiError::illegal_argument(format!(
                    "Malformed action/metadata line, expected one of [create, delete, index] but found [{other}]"
                )))
            }
        };
        ops.push(op);
    }
    if ops.is_empty() {
        return Err(ApiError::validation("no requests added"));
    }
    Ok(ops)
}

/// Apply one action, producing its entry in the response `items` array.
pub fn apply(store: &mut Store, op: BulkOp) -> Value {
    match op {
        BulkOp::Index { index, id, source } => write("index", store, index, id, source, false),
        BulkOp::Create { index, id, source } => write("create", store, index, id, source, true),
        BulkOp::Delete { index, id } => {
            let item = match store.delete(&index, &id) {
                Some(version) => result_item(&index, &id, version, "deleted", 200),
                None => result_item(&index, &id, 1, "not_found", 404),
            };
            keyed("delete", item)
        }
    }
}

/// Whether any item carries an `error` object.
pub fn has_errors(items: &[Value]) -> bool {
    items
        .iter()
        .filter_map(Value::as_object)
        .flat_map(|item| item.values())
        .any(|result| result.get("error").is_some())
}

fn write(
    action: &str,
    store: &mut Store,
    index: String,
    id: Option<String>,
    source: Value,
    create_only: bool,
) -> Value {
    let id = id.unwrap_or_else(generate_id);
    let item = match store.index(&index, &id, source, create_only) {
        Ok((version, outcome)) => {
            result_item(&index, &id, version, outcome.as_str(), outcome.status().as_u16())
        }
        Err(err) => serde_json::json!({
            "_index": index,
            "_id": id,
            "status": err.status().as_u16(),
            "error": err.cause(),
        }),
    };
    keyed(action, item)
}

fn result_item(index: &str, id: &str, version: u64, result: &str, status: u16) -> Value {
    serde_json::json!({
        "_index": index,
        "_id": id,
        "_version": version,
        "result": result,
        "status": status,
    })
}

fn keyed(action: &str, item: Value) -> Value {
    let mut map = Map::new();
    map.insert(action.to_string(), item);
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_mixed_actions() {
        let body = concat!(
            "{\"index\":{\"_index\":\"products\",\"_id\":\"1\"}}\n",
            "{\"name\":\"lamp\"}\n",
            "\n",
            "{\"create\":{\"_id\":\"2\"}}\n",
            "{\"name\":\"chair\"}\n",
            "{\"delete\":{\"_index\":\"orders\",\"_id\":\"9\"}}\n",
        );
        let ops = parse(body, Some("fallback")).unwrap();
        assert_eq!(
            ops,
            vec![
                BulkOp::Index {
                    index: "products".into(),
                    id: Some("1".into()),
                    source: json!({"name": "lamp"}),
                },
                BulkOp::Create {
                    index: "fallback".into(),
                    id: Some("2".into()),
                    source: json!({"name": "chair"}),
                },
                BulkOp::Delete {
                    index: "orders".into(),
                    id: "9".into(),
                },
            ]
        );
    }

    #[test]
    fn rejects_malformed_bodies() {
        assert_eq!(parse("", None).unwrap_err().kind(), "action_request_validation_exception");
        assert_eq!(parse("not json", None).unwrap_err().kind(), "parse_exception");
        assert_eq!(
            parse("{\"index\":{\"_id\":\"1\"}}\n{}\n", None).unwrap_err().reason(),
            "Validation Failed: 1: index is missing;"
        );
        assert_eq!(
            parse("{\"index\":{\"_index\":\"i\"}}\n", None).unwrap_err().kind(),
            "parse_exception"
        );
        assert_eq!(
            parse("{\"update\":{\"_index\":\"i\",\"_id\":\"1\"}}\n{}\n", None)
                .unwrap_err()
                .kind(),
            "illegal_argument_exception"
        );
        assert_eq!(
            parse("{\"delete\":{\"_index\":\"i\"}}\n", None).unwrap_err().reason(),
            "Validation Failed: 1: id is missing;"
        );
    }

    #[test]
    fn apply_reports_per_item_results() {
        let mut store = Store::new();
        let ops = parse(
            concat!(
                "{\"index\":{\"_index\":\"i\",\"_id\":\"1\"}}\n{\"n\":1}\n",
                "{\"create\":{\"_index\":\"i\",\"_id\":\"1\"}}\n{\"n\":2}\n",
                "{\"delete\":{\"_index\":\"i\",\"_id\":\"missing\"}}\n",
            ),
            None,
        )
        .unwrap();
        let items: Vec<Value> = ops.into_iter().map(|op| apply(&mut store, op)).collect();

        assert_eq!(items[0]["index"]["result"], "created");
        assert_eq!(items[0]["index"]["status"], 201);
        assert_eq!(items[1]["create"]["status"], 409);
        assert_eq!(
            items[1]["create"]["error"]["type"],
            "version_conflict_engine_exception"
        );
        assert_eq!(items[2]["delete"]["result"], "not_found");
        assert!(has_errors(&items));
        assert!(!has_errors(&[items[0].clone(), items[2].clone()]));
    }

    #[test]
    fn missing_ids_are_generated() {
        let mut store = Store::new();
        let item = apply(
            &mut store,
            BulkOp::Index {
                index: "i".into(),
                id: None,
                source: json!({}),
            },
        );
        let id = item["index"]["_id"].as_str().unwrap();
        assert_eq!(id.len(), 32);
        assert!(store.get("i", id).is_some());
    }
}
