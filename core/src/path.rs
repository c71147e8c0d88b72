//! URL path assembly.
//!
//! Segments are appended in the order they are declared, each prefixed by a
//! single `/`. Parameter segments are percent-escaped so an id such as `a/b`
//! stays one segment; commas are left alone because the API uses them to
//! address several indices at once.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::params::join;

const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    path: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fixed segment such as `_doc` or `_search`, unescaped.
    pub fn literal(mut self, segment: &str) -> Self {
        self.path.push('/');
        self.path.push_str(segment);
        self
    }

    /// Append a required parameter.
    pub fn param(mut self, value: &str) -> Self {
        self.path.push('/');
        self.path.extend(utf8_percent_encode(value, SEGMENT));
        self
    }

    /// Append a required list parameter, comma-joined.
    pub fn list<S: AsRef<str>>(self, values: &[S]) -> Self {
        self.param(&join(values))
    }

    /// Append an optional parameter. `None` and `""` add nothing, not even
    /// the separator.
    pub fn optional(self, value: Option<&str>) -> Self {
        match value {
            Some(value) if !value.is_empty() => self.param(value),
            _ => self,
        }
    }

    /// Append an optional list parameter. A list with no non-empty items
    /// adds nothing.
    pub fn optional_list<S: AsRef<str>>(self, values: &[S]) -> Self {
        let joined = join(values);
        self.optional(Some(joined.as_str()))
    }

    pub fn build(self) -> String {
        if self.path.is_empty() {
            "/".to_string()
        } else {
            self.path
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_keep_declared_order() {
        let path = PathBuilder::new()
            .param("products")
            .literal("_doc")
            .param("42")
            .build();
        assert_eq!(path, "/products/_doc/42");
    }

    #[test]
    fn list_params_join_with_commas() {
        let path = PathBuilder::new()
            .list(&["a", "b", "c"])
            .literal("_search")
            .build();
        assert_eq!(path, "/a,b,c/_search");
    }

    #[test]
    fn absent_trailing_param_leaves_no_separator() {
        let path = PathBuilder::new()
            .literal("_template")
            .optional(None)
            .build();
        assert_eq!(path, "/_template");

        let path = PathBuilder::new()
            .literal("_template")
            .optional(Some(""))
            .build();
        assert_eq!(path, "/_template");
    }

    #[test]
    fn empty_optional_list_is_skipped() {
        let names: [&str; 0] = [];
        let path = PathBuilder::new()
            .literal("_cluster")
            .literal("health")
            .optional_list(&names)
            .build();
        assert_eq!(path, "/_cluster/health");
    }

    #[test]
    fn optional_list_of_empty_strings_is_skipped() {
        let path = PathBuilder::new()
            .literal("_template")
            .optional_list(&[""])
            .build();
        assert_eq!(path, "/_template");

        let path = PathBuilder::new()
            .optional_list(&["", ""])
            .literal("_search")
            .build();
        assert_eq!(path, "/_search");

        let path = PathBuilder::new()
            .optional_list(&["logs", ""])
            .literal("_search")
            .build();
        assert_eq!(path, "/logs/_search");
    }

    #[test]
    fn leading_optional_param() {
        let path = PathBuilder::new()
            .optional(Some("logs"))
            .literal("_bulk")
            .build();
        assert_eq!(path, "/logs/_bulk");
    }

    #[test]
    fn params_are_escaped() {
        let path = PathBuilder::new()
            .param("my index")
            .literal("_doc")
            .param("a/b?c")
            .build();
        assert_eq!(path, "/my%20index/_doc/a%2Fb%3Fc");
    }

    #[test]
    fn empty_builder_is_root() {
        assert_eq!(PathBuilder::new().build(), "/");
    }
}
