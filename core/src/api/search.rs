use std::time::Duration;

use http::Method;

use crate::error::Result;
use crate::http::Body;
use crate::params::QueryParams;
use crate::path::PathBuilder;
use crate::request::{CommonOptions, CommonParams, Endpoint, RequestBuilder};

/// `[/{index}]/_search`
///
/// Sent as `POST` when a query body is attached, `GET` otherwise.
#[derive(Debug, Default)]
pub struct Search {
    indices: Vec<String>,
    body: Option<Body>,
    allow_no_indices: Option<bool>,
    allow_partial_search_results: Option<bool>,
    analyzer: Option<String>,
    default_operator: Option<String>,
    expand_wildcards: Vec<String>,
    from: Option<i64>,
    ignore_unavailable: Option<bool>,
    preference: Option<String>,
    q: Option<String>,
    request_cache: Option<bool>,
    rest_total_hits_as_int: Option<bool>,
    routing: Vec<String>,
    scroll: Option<Duration>,
    search_type: Option<String>,
    seq_no_primary_term: Option<bool>,
    size: Option<i64>,
    sort: Vec<String>,
    source: Vec<String>,
    terminate_after: Option<i64>,
    timeout: Option<Duration>,
    track_total_hits: Option<String>,
    typed_keys: Option<bool>,
    version: Option<bool>,
    common: CommonOptions,
}

impl Search {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indices to search. Empty means all indices.
    pub fn index<I: IntoIterator<Item = S>, S: Into<String>>(mut self, indices: I) -> Self {
        self.indices = indices.into_iter().map(Into::into).collect();
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn allow_no_indices(mut self, allow: bool) -> Self {
        self.allow_no_indices = Some(allow);
        self
    }

    pub fn allow_partial_search_results(mut self, allow: bool) -> Self {
        self.allow_partial_search_results = Some(allow);
        self
    }

    pub fn analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    pub fn default_operator(mut self, operator: impl Into<String>) -> Self {
        self.default_operator = Some(operator.into());
        self
    }

    pub fn expand_wildcards<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.expand_wildcards = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn from(mut self, from: i64) -> Self {
        self.from = Some(from);
        self
    }

    pub fn ignore_unavailable(mut self, ignore: bool) -> Self {
        self.ignore_unavailable = Some(ignore);
        self
    }

    pub fn preference(mut self, preference: impl Into<String>) -> Self {
        self.preference = Some(preference.into());
        self
    }

    /// Query in Lucene query-string syntax.
    pub fn q(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    pub fn request_cache(mut self, enabled: bool) -> Self {
        self.request_cache = Some(enabled);
        self
    }

    pub fn rest_total_hits_as_int(mut self, as_int: bool) -> Self {
        self.rest_total_hits_as_int = Some(as_int);
        self
    }

    pub fn routing<I: IntoIterator<Item = S>, S: Into<String>>(mut self, routing: I) -> Self {
        self.routing = routing.into_iter().map(Into::into).collect();
        self
    }

    pub fn scroll(mut self, keep_alive: Duration) -> Self {
        self.scroll = Some(keep_alive);
        self
    }

    pub fn search_type(mut self, search_type: impl Into<String>) -> Self {
        self.search_type = Some(search_type.into());
        self
    }

    pub fn seq_no_primary_term(mut self, enabled: bool) -> Self {
        self.seq_no_primary_term = Some(enabled);
        self
    }

    pub fn size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    /// `field:direction` pairs.
    pub fn sort<I: IntoIterator<Item = S>, S: Into<String>>(mut self, sort: I) -> Self {
        self.sort = sort.into_iter().map(Into::into).collect();
        self
    }

    pub fn source<I: IntoIterator<Item = S>, S: Into<String>>(mut self, fields: I) -> Self {
        self.source = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn terminate_after(mut self, count: i64) -> Self {
        self.terminate_after = Some(count);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// `true`, `false` or a hit count.
    pub fn track_total_hits(mut self, value: impl Into<String>) -> Self {
        self.track_total_hits = Some(value.into());
        self
    }

    pub fn typed_keys(mut self, enabled: bool) -> Self {
        self.typed_keys = Some(enabled);
        self
    }

    pub fn version(mut self, enabled: bool) -> Self {
        self.version = Some(enabled);
        self
    }
}

impl CommonParams for Search {
    fn common_mut(&mut self) -> &mut CommonOptions {
        &mut self.common
    }
}

impl Endpoint for Search {
    fn build(self) -> Result<http::Request<Body>> {
        let method = if self.body.is_some() {
            Method::POST
        } else {
            Method::GET
        };
        let path = PathBuilder::new()
            .optional_list(&self.indices)
            .literal("_search")
            .build();

        let mut params = QueryParams::new();
        params.set_bool("allow_no_indices", self.allow_no_indices);
        params.set_bool("allow_partial_search_results", self.allow_partial_search_results);
        params.set_str("analyzer", self.analyzer.as_deref());
        params.set_str("default_operator", self.default_operator.as_deref());
        params.set_list("expand_wildcards", &self.expand_wildcards);
        params.set_number("from", self.from);
        params.set_bool("ignore_unavailable", self.ignore_unavailable);
        params.set_str("preference", self.preference.as_deref());
        params.set_str("q", self.q.as_deref());
        params.set_bool("request_cache", self.request_cache);
        params.set_bool("rest_total_hits_as_int", self.rest_total_hits_as_int);
        params.set_list("routing", &self.routing);
        params.set_duration("scroll", self.scroll);
        params.set_str("search_type", self.search_type.as_deref());
        params.set_bool("seq_no_primary_term", self.seq_no_primary_term);
        params.set_number("size", self.size);
        params.set_list("sort", &self.sort);
        params.set_list("_source", &self.source);
        params.set_number("terminate_after", self.terminate_after);
        params.set_duration("timeout", self.timeout);
        params.set_str("track_total_hits", self.track_total_hits.as_deref());
        params.set_bool("typed_keys", self.typed_keys);
        params.set_bool("version", self.version);

        RequestBuilder::new(method, path)
            .params(params)
            .body(self.body)
            .options(self.common)
            .build()
    }
}
