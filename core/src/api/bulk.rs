use std::time::Duration;

use http::Method;

use super::Refresh;
use crate::error::Result;
use crate::http::Body;
use crate::params::QueryParams;
use crate::path::PathBuilder;
use crate::request::{CommonOptions, CommonParams, Endpoint, RequestBuilder};

/// `POST [/{index}]/_bulk`
///
/// The body is newline-delimited JSON: one action line, optionally followed
/// by a source line, each terminated by `\n`.
#[derive(Debug)]
pub struct Bulk {
    index: Option<String>,
    body: Body,
    pipeline: Option<String>,
    refresh: Option<Refresh>,
    require_alias: Option<bool>,
    routing: Option<String>,
    source: Vec<String>,
    source_excludes: Vec<String>,
    source_includes: Vec<String>,
    timeout: Option<Duration>,
    wait_for_active_shards: Option<String>,
    common: CommonOptions,
}

impl Bulk {
    pub fn new(body: impl Into<Body>) -> Self {
        Self {
            index: None,
            body: body.into(),
            pipeline: None,
            refresh: None,
            require_alias: None,
            routing: None,
            source: Vec::new(),
            source_excludes: Vec::new(),
            source_includes: Vec::new(),
            timeout: None,
            wait_for_active_shards: None,
            common: CommonOptions::default(),
        }
    }

    /// Default index for actions that do not name one.
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn pipeline(mut self, pipeline: impl Into<String>) -> Self {
        self.pipeline = Some(pipeline.into());
        self
    }

    pub fn refresh(mut self, refresh: Refresh) -> Self {
        self.refresh = Some(refresh);
        self
    }

    pub fn require_alias(mut self, require_alias: bool) -> Self {
        self.require_alias = Some(require_alias);
        self
    }

    pub fn routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }

    pub fn source<I: IntoIterator<Item = S>, S: Into<String>>(mut self, fields: I) -> Self {
        self.source = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn source_excludes<I: IntoIterator<Item = S>, S: Into<String>>(mut self, fields: I) -> Self {
        self.source_excludes = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn source_includes<I: IntoIterator<Item = S>, S: Into<String>>(mut self, fields: I) -> Self {
        self.source_includes = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn wait_for_active_shards(mut self, shards: impl Into<String>) -> Self {
        self.wait_for_active_shards = Some(shards.into());
        self
    }
}

impl CommonParams for Bulk {
    fn common_mut(&mut self) -> &mut CommonOptions {
        &mut self.common
    }
}

impl Endpoint for Bulk {
    fn build(self) -> Result<http::Request<Body>> {
        let path = PathBuilder::new()
            .optional(self.index.as_deref())
            .literal("_bulk")
            .build();

        let mut params = QueryParams::new();
        params.set_str("pipeline", self.pipeline.as_deref());
        params.set_str("refresh", self.refresh.as_ref().map(Refresh::as_str));
        params.set_bool("require_alias", self.require_alias);
        params.set_str("routing", self.routing.as_deref());
        params.set_list("_source", &self.source);
        params.set_list("_source_excludes", &self.source_excludes);
        params.set_list("_source_includes", &self.source_includes);
        params.set_duration("timeout", self.timeout);
        params.set_str("wait_for_active_shards", self.wait_for_active_shards.as_deref());

        RequestBuilder::new(Method::POST, path)
            .params(params)
            .body(Some(self.body))
            .options(self.common)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "{\"index\":{\"_id\":\"1\"}}\n{\"name\":\"lamp\"}\n";

    #[test]
    fn bulk_without_index() {
        let req = Bulk::new(BODY).build().unwrap();
        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.uri(), "/_bulk");
    }

    #[test]
    fn bulk_with_default_index() {
        let req = Bulk::new(BODY)
            .index("products")
            .refresh(Refresh::True)
            .build()
            .unwrap();
        assert_eq!(req.uri(), "/products/_bulk?refresh=true");
        assert_eq!(req.headers()["content-type"], "application/json");
    }
}
