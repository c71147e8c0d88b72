//! In-memory indices and legacy templates.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredDoc {
    pub version: u64,
    pub source: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Updated,
}

impl WriteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteOutcome::Created => "created",
            WriteOutcome::Updated => "updated",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            WriteOutcome::Created => StatusCode::CREATED,
            WriteOutcome::Updated => StatusCode::OK,
        }
    }
}

/// Auto-generated document id.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Default)]
pub struct Store {
    indices: BTreeMap<String, BTreeMap<String, StoredDoc>>,
    templates: BTreeMap<String, Value>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: &str, id: &str) -> Option<&StoredDoc> {
        self.indices.get(index)?.get(id)
    }

    /// Store `source` under `index/id`, creating the index on first write.
    pub fn index(
        &mut self,
        index: &str,
        id: &str,
        source: Value,
        create_only: bool,
    ) -> Result<(u64, WriteOutcome), ApiError> {
        let docs = self.indices.entry(index.to_string()).or_default();
        match docs.get_mut(id) {
            Some(existing) if create_only => Err(ApiError::version_conflict(id, existing.version)),
            Some(existing) => {
                existing.version += 1;
                existing.source = source;
                Ok((existing.version, WriteOutcome::Updated))
            }
            None => {
                docs.insert(id.to_string(), StoredDoc { version: 1, source });
                Ok((1, WriteOutcome::Created))
            }
        }
    }

    /// Remove a document, returning the version the delete was recorded at.
    pub fn delete(&mut self, index: &str, id: &str) -> Option<u64> {
        let doc = self.indices.get_mut(index)?.remove(id)?;
        Some(doc.version + 1)
    }

    /// Expand a comma-separated index expression. `None`, `_all` and `*`
    /// select every index; a trailing `*` is a prefix match. Naming a
    /// concrete index that does not exist is an error.
    pub fn resolve(&self, expr: Option<&str>) -> Result<Vec<String>, ApiError> {
        let expr = match expr {
            None | Some("_all") | Some("*") => return Ok(self.indices.keys().cloned().collect()),
            Some(expr) => expr,
        };
        let mut names = Vec::new();
        for name in expr.split(',').filter(|name| !name.is_empty()) {
            if let Some(prefix) = name.strip_suffix('*') {
                names.extend(self.indices.keys().filter(|k| k.starts_with(prefix)).cloned());
            } else if self.indices.contains_key(name) {
                names.push(name.to_string());
            } else {
                return Err(ApiError::index_not_found(name));
            }
        }
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Matching documents, ordered by index then id.
    pub fn search<'a>(
        &'a self,
        indices: &[String],
        matcher: &Matcher,
    ) -> Vec<(&'a str, &'a str, &'a StoredDoc)> {
        indices
            .iter()
            .filter_map(|name| self.indices.get_key_value(name))
            .flat_map(|(name, docs)| {
                docs.iter()
                    .map(move |(id, doc)| (name.as_str(), id.as_str(), doc))
            })
            .filter(|(_, _, doc)| matcher.matches(&doc.source))
            .collect()
    }

    pub fn put_template(&mut self, name: &str, body: Value, create: bool) -> Result<(), ApiError> {
        let has_patterns = body
            .get("index_patterns")
            .is_some_and(|patterns| patterns.is_array() || patterns.is_string());
        if !has_patterns {
            return Err(ApiError::validation("index patterns are missing"));
        }
        if create && self.templates.contains_key(name) {
            return Err(ApiError::illegal_argument(format!(
                "index_template [{name}] already exists"
            )));
        }
        self.templates.insert(name.to_string(), body);
        Ok(())
    }

    /// Templates selected by a comma-separated name list (trailing `*`
    /// allowed), or all of them.
    pub fn templates(&self, names: Option<&str>) -> Map<String, Value> {
        let Some(names) = names else {
            return self.templates.clone().into_iter().collect();
        };
        let mut found = Map::new();
        for name in names.split(',') {
            let selected = self.templates.iter().filter(|(key, _)| match name.strip_suffix('*') {
                Some(prefix) => key.starts_with(prefix),
                None => key.as_str() == name,
            });
            for (key, template) in selected {
                found.insert(key.clone(), template.clone());
            }
        }
        found
    }
}

/// A deliberately small query language: everything, or a case-insensitive
/// substring match on one field (or any field).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    All,
    Text { field: Option<String>, text: String },
}

impl Matcher {
    /// Lucene-style `field:text` or bare `text`.
    pub fn query_string(q: &str) -> Self {
        match q.split_once(':') {
            _ if q.is_empty() || q == "*" || q == "*:*" => Matcher::All,
            Some((field, text)) => Matcher::Text {
                field: Some(field.to_string()),
                text: text.to_lowercase(),
            },
            None => Matcher::Text {
                field: None,
                text: q.to_lowercase(),
            },
        }
    }

    /// The `query` object of a search body. Understands `match_all`,
    /// `match`, `term` and `query_string`; anything else matches all.
    pub fn from_query(query: Option<&Value>) -> Self {
        let Some(query) = query.and_then(Value::as_object) else {
            return Matcher::All;
        };
        if let Some(q) = query
            .get("query_string")
            .and_then(|qs| qs.get("query"))
            .and_then(Value::as_str)
        {
            return Matcher::query_string(q);
        }
        let clause = query
            .get("match")
            .or_else(|| query.get("term"))
            .and_then(Value::as_object)
            .and_then(|fields| fields.iter().next());
        match clause {
            Some((field, value)) => {
                let value = value
                    .get("query")
                    .or_else(|| value.get("value"))
                    .unwrap_or(value);
                Matcher::Text {
                    field: Some(field.clone()),
                    text: scalar_text(value).to_lowercase(),
                }
            }
            None => Matcher::All,
        }
    }

    pub fn matches(&self, source: &Value) -> bool {
        match self {
            Matcher::All => true,
            Matcher::Text { field: Some(field), text } => {
                source.get(field).is_some_and(|value| contains(value, text))
            }
            Matcher::Text { field: None, text } => contains(source, text),
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn contains(value: &Value, text: &str) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => s.to_lowercase().contains(text),
        Value::Array(items) => items.iter().any(|item| contains(item, text)),
        Value::Object(fields) => fields.values().any(|field| contains(field, text)),
        other => other.to_string() == text,
    }
}
