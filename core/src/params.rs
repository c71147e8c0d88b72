//! Query-string assembly.
//!
//! # Design
//! `QueryParams` only ever holds parameters that are present. Every setter
//! takes the optional form of its value and drops `None`, empty strings, empty
//! lists and zero durations on the floor, so an absent parameter can never
//! leak into the encoded query as `key=` or `key=0`.
//!
//! Keys are kept sorted, which makes the encoded query deterministic.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped in query keys and values. Commas stay literal so
/// list-valued parameters read as `a,b,c` on the wire.
const QUERY: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

const NANOS_PER_MILLI: u128 = 1_000_000;

/// Format a duration the way the REST API expects it.
///
/// Anything below one millisecond is sent as whole nanoseconds (`500000nanos`),
/// everything else as whole milliseconds, truncated (`1500ms`).
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos < NANOS_PER_MILLI {
        format!("{nanos}nanos")
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// A sorted set of present query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: BTreeMap<&'static str, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a raw string value. Empty strings are treated as absent.
    pub fn set(&mut self, key: &'static str, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.params.insert(key, value);
        }
    }

    pub fn set_str(&mut self, key: &'static str, value: Option<&str>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    /// Tri-state boolean: `None` is absent, `Some(false)` is sent as `false`.
    pub fn set_bool(&mut self, key: &'static str, value: Option<bool>) {
        if let Some(value) = value {
            self.params.insert(key, value.to_string());
        }
    }

    /// Flag that is only ever sent as `true`.
    pub fn set_flag(&mut self, key: &'static str, value: bool) {
        if value {
            self.params.insert(key, "true".to_string());
        }
    }

    pub fn set_number<N: Display>(&mut self, key: &'static str, value: Option<N>) {
        if let Some(value) = value {
            self.params.insert(key, value.to_string());
        }
    }

    /// A zero duration counts as absent.
    pub fn set_duration(&mut self, key: &'static str, value: Option<Duration>) {
        match value {
            Some(duration) if !duration.is_zero() => {
                self.params.insert(key, format_duration(duration));
            }
            _ => {}
        }
    }

    /// Comma-joined list. Empty items are skipped, so an empty list or one
    /// holding only empty strings counts as absent.
    pub fn set_list<S: AsRef<str>>(&mut self, key: &'static str, values: &[S]) {
        self.set(key, join(values));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.params.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Percent-encode into `k1=v1&k2=v2`, keys in sorted order.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.params {
            if !out.is_empty() {
                out.push('&');
            }
            out.extend(utf8_percent_encode(key, QUERY));
            out.push('=');
            out.extend(utf8_percent_encode(value, QUERY));
        }
        out
    }
}

/// Comma-join the non-empty items of a list.
pub(crate) fn join<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(AsRef::as_ref)
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_below_one_milli_uses_nanos() {
        assert_eq!(format_duration(Duration::from_micros(500)), "500000nanos");
        assert_eq!(format_duration(Duration::from_nanos(999_999)), "999999nanos");
    }

    #[test]
    fn duration_from_one_milli_uses_millis() {
        assert_eq!(format_duration(Duration::from_millis(1)), "1ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1500ms");
        assert_eq!(format_duration(Duration::from_secs(30)), "30000ms");
    }

    #[test]
    fn duration_millis_truncate() {
        assert_eq!(format_duration(Duration::from_micros(1999)), "1ms");
    }

    #[test]
    fn zero_duration_is_absent() {
        let mut params = QueryParams::new();
        params.set_duration("timeout", Some(Duration::ZERO));
        params.set_duration("master_timeout", None);
        assert!(params.is_empty());
        assert_eq!(params.encode(), "");
    }

    #[test]
    fn absent_values_never_appear() {
        let mut params = QueryParams::new();
        params.set_bool("realtime", None);
        params.set_number::<i64>("size", None);
        params.set_str("routing", None);
        params.set_str("preference", Some(""));
        params.set_flag("pretty", false);
        params.set_list::<&str>("filter_path", &[]);
        assert!(params.is_empty());
    }

    #[test]
    fn explicit_false_and_zero_are_present() {
        let mut params = QueryParams::new();
        params.set_bool("realtime", Some(false));
        params.set_number("from", Some(0));
        assert_eq!(params.get("realtime"), Some("false"));
        assert_eq!(params.get("from"), Some("0"));
    }

    #[test]
    fn lists_join_with_commas() {
        let mut params = QueryParams::new();
        params.set_list("filter_path", &["a", "b", "c"]);
        assert_eq!(params.get("filter_path"), Some("a,b,c"));
        assert_eq!(params.encode(), "filter_path=a,b,c");
    }

    #[test]
    fn lists_of_empty_strings_are_absent() {
        let mut params = QueryParams::new();
        params.set_list("filter_path", &[""]);
        params.set_list("_source", &["", ""]);
        assert!(params.is_empty());
        assert_eq!(params.encode(), "");
    }

    #[test]
    fn empty_list_items_are_skipped() {
        let mut params = QueryParams::new();
        params.set_list("routing", &["a", "", "b"]);
        assert_eq!(params.get("routing"), Some("a,b"));
    }

    #[test]
    fn encode_sorts_keys_and_escapes_values() {
        let mut params = QueryParams::new();
        params.set("q", "title:hello world&more");
        params.set_flag("pretty", true);
        params.set_number("size", Some(10));
        assert_eq!(
            params.encode(),
            "pretty=true&q=title:hello%20world%26more&size=10"
        );
    }

    #[test]
    fn last_write_wins() {
        let mut params = QueryParams::new();
        params.set("routing", "a");
        params.set("routing", "b");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("routing"), Some("b"));
    }
}
