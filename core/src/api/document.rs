use std::time::Duration;

use http::Method;

use super::{OpType, Refresh, VersionType, DEFAULT_DOC_TYPE};
use crate::error::Result;
use crate::http::Body;
use crate::params::QueryParams;
use crate::path::PathBuilder;
use crate::request::{CommonOptions, CommonParams, Endpoint, RequestBuilder};

fn doc_path(index: &str, doc_type: Option<&str>, id: Option<&str>) -> String {
    PathBuilder::new()
        .param(index)
        .param(doc_type.filter(|t| !t.is_empty()).unwrap_or(DEFAULT_DOC_TYPE))
        .optional(id)
        .build()
}

/// Fields shared by `Get` and `Exists`.
#[derive(Debug, Clone, Default)]
struct ReadParams {
    preference: Option<String>,
    realtime: Option<bool>,
    refresh: Option<bool>,
    routing: Option<String>,
    source: Vec<String>,
    source_excludes: Vec<String>,
    source_includes: Vec<String>,
    stored_fields: Vec<String>,
    version: Option<i64>,
    version_type: Option<VersionType>,
}

impl ReadParams {
    fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.set_str("preference", self.preference.as_deref());
        params.set_bool("realtime", self.realtime);
        params.set_bool("refresh", self.refresh);
        params.set_str("routing", self.routing.as_deref());
        params.set_list("_source", &self.source);
        params.set_list("_source_excludes", &self.source_excludes);
        params.set_list("_source_includes", &self.source_includes);
        params.set_list("stored_fields", &self.stored_fields);
        params.set_number("version", self.version);
        params.set_str("version_type", self.version_type.as_ref().map(VersionType::as_str));
        params
    }
}

macro_rules! read_setters {
    () => {
        pub fn preference(mut self, preference: impl Into<String>) -> Self {
            self.read.preference = Some(preference.into());
            self
        }

        pub fn realtime(mut self, realtime: bool) -> Self {
            self.read.realtime = Some(realtime);
            self
        }

        pub fn refresh(mut self, refresh: bool) -> Self {
            self.read.refresh = Some(refresh);
            self
        }

        pub fn routing(mut self, routing: impl Into<String>) -> Self {
            self.read.routing = Some(routing.into());
            self
        }

        pub fn source<I: IntoIterator<Item = S>, S: Into<String>>(mut self, fields: I) -> Self {
            self.read.source = fields.into_iter().map(Into::into).collect();
            self
        }

        pub fn source_excludes<I: IntoIterator<Item = S>, S: Into<String>>(mut self, fields: I) -> Self {
            self.read.source_excludes = fields.into_iter().map(Into::into).collect();
            self
        }

        pub fn source_includes<I: IntoIterator<Item = S>, S: Into<String>>(mut self, fields: I) -> Self {
            self.read.source_includes = fields.into_iter().map(Into::into).collect();
            self
        }

        pub fn stored_fields<I: IntoIterator<Item = S>, S: Into<String>>(mut self, fields: I) -> Self {
            self.read.stored_fields = fields.into_iter().map(Into::into).collect();
            self
        }

        pub fn version(mut self, version: i64) -> Self {
            self.read.version = Some(version);
            self
        }

        pub fn version_type(mut self, version_type: VersionType) -> Self {
            self.read.version_type = Some(version_type);
            self
        }

        /// Override the `_doc` type segment.
        pub fn document_type(mut self, doc_type: impl Into<String>) -> Self {
            self.doc_type = Some(doc_type.into());
            self
        }
    };
}

/// `GET /{index}/_doc/{id}`
#[derive(Debug, Clone)]
pub struct Get {
    index: String,
    id: String,
    doc_type: Option<String>,
    read: ReadParams,
    common: CommonOptions,
}

impl Get {
    pub fn new(index: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            id: id.into(),
            doc_type: None,
            read: ReadParams::default(),
            common: CommonOptions::default(),
        }
    }

    read_setters!();
}

impl CommonParams for Get {
    fn common_mut(&mut self) -> &mut CommonOptions {
        &mut self.common
    }
}

impl Endpoint for Get {
    fn build(self) -> Result<http::Request<Body>> {
        let path = doc_path(&self.index, self.doc_type.as_deref(), Some(&self.id));
        RequestBuilder::new(Method::GET, path)
            .params(self.read.to_params())
            .options(self.common)
            .build()
    }
}

/// `HEAD /{index}/_doc/{id}`
#[derive(Debug, Clone)]
pub struct Exists {
    index: String,
    id: String,
    doc_type: Option<String>,
    read: ReadParams,
    common: CommonOptions,
}

impl Exists {
    pub fn new(index: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            id: id.into(),
            doc_type: None,
            read: ReadParams::default(),
            common: CommonOptions::default(),
        }
    }

    read_setters!();
}

impl CommonParams for Exists {
    fn common_mut(&mut self) -> &mut CommonOptions {
        &mut self.common
    }
}

impl Endpoint for Exists {
    fn build(self) -> Result<http::Request<Body>> {
        let path = doc_path(&self.index, self.doc_type.as_deref(), Some(&self.id));
        RequestBuilder::new(Method::HEAD, path)
            .params(self.read.to_params())
            .options(self.common)
            .build()
    }
}

/// `PUT /{index}/_doc/{id}` or, without an id, `POST /{index}/_doc`.
#[derive(Debug)]
pub struct Index {
    index: String,
    id: Option<String>,
    doc_type: Option<String>,
    body: Body,
    if_primary_term: Option<i64>,
    if_seq_no: Option<i64>,
    op_type: Option<OpType>,
    pipeline: Option<String>,
    refresh: Option<Refresh>,
    require_alias: Option<bool>,
    routing: Option<String>,
    timeout: Option<Duration>,
    version: Option<i64>,
    version_type: Option<VersionType>,
    wait_for_active_shards: Option<String>,
    common: CommonOptions,
}

impl Index {
    pub fn new(index: impl Into<String>, body: impl Into<Body>) -> Self {
        Self {
            index: index.into(),
            id: None,
            doc_type: None,
            body: body.into(),
            if_primary_term: None,
            if_seq_no: None,
            op_type: None,
            pipeline: None,
            refresh: None,
            require_alias: None,
            routing: None,
            timeout: None,
            version: None,
            version_type: None,
            wait_for_active_shards: None,
            common: CommonOptions::default(),
        }
    }

    /// Document id. Without one the server assigns an id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn document_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    pub fn if_primary_term(mut self, term: i64) -> Self {
        self.if_primary_term = Some(term);
        self
    }

    pub fn if_seq_no(mut self, seq_no: i64) -> Self {
        self.if_seq_no = Some(seq_no);
        self
    }

    pub fn op_type(mut self, op_type: OpType) -> Self {
        self.op_type = Some(op_type);
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

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn version_type(mut self, version_type: VersionType) -> Self {
        self.version_type = Some(version_type);
        self
    }

    pub fn wait_for_active_shards(mut self, shards: impl Into<String>) -> Self {
        self.wait_for_active_shards = Some(shards.into());
        self
    }

    fn method(&self) -> Method {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => Method::PUT,
            _ => Method::POST,
        }
    }
}

impl CommonParams for Index {
    fn common_mut(&mut self) -> &mut CommonOptions {
        &mut self.common
    }
}

impl Endpoint for Index {
    fn build(self) -> Result<http::Request<Body>> {
        let method = self.method();
        let path = doc_path(&self.index, self.doc_type.as_deref(), self.id.as_deref());

        let mut params = QueryParams::new();
        params.set_number("if_primary_term", self.if_primary_term);
        params.set_number("if_seq_no", self.if_seq_no);
        params.set_str("op_type", self.op_type.as_ref().map(OpType::as_str));
        params.set_str("pipeline", self.pipeline.as_deref());
        params.set_str("refresh", self.refresh.as_ref().map(Refresh::as_str));
        params.set_bool("require_alias", self.require_alias);
        params.set_str("routing", self.routing.as_deref());
        params.set_duration("timeout", self.timeout);
        params.set_number("version", self.version);
        params.set_str("version_type", self.version_type.as_ref().map(VersionType::as_str));
        params.set_str("wait_for_active_shards", self.wait_for_active_shards.as_deref());

        RequestBuilder::new(method, path)
            .params(params)
            .body(Some(self.body))
            .options(self.common)
            .build()
    }
}

/// `DELETE /{index}/_doc/{id}`
#[derive(Debug, Clone)]
pub struct Delete {
    index: String,
    id: String,
    doc_type: Option<String>,
    if_primary_term: Option<i64>,
    if_seq_no: Option<i64>,
    refresh: Option<Refresh>,
    routing: Option<String>,
    timeout: Option<Duration>,
    version: Option<i64>,
    version_type: Option<VersionType>,
    wait_for_active_shards: Option<String>,
    common: CommonOptions,
}

impl Delete {
    pub fn new(index: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            id: id.into(),
            doc_type: None,
            if_primary_term: None,
            if_seq_no: None,
            refresh: None,
            routing: None,
            timeout: None,
            version: None,
            version_type: None,
            wait_for_active_shards: None,
            common: CommonOptions::default(),
        }
    }

    pub fn document_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    pub fn if_primary_term(mut self, term: i64) -> Self {
        self.if_primary_term = Some(term);
        self
    }

    pub fn if_seq_no(mut self, seq_no: i64) -> Self {
        self.if_seq_no = Some(seq_no);
        self
    }

    pub fn refresh(mut self, refresh: Refresh) -> Self {
        self.refresh = Some(refresh);
        self
    }

    pub fn routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn version_type(mut self, version_type: VersionType) -> Self {
        self.version_type = Some(version_type);
        self
    }

    pub fn wait_for_active_shards(mut self, shards: impl Into<String>) -> Self {
        self.wait_for_active_shards = Some(shards.into());
        self
    }
}

impl CommonParams for Delete {
    fn common_mut(&mut self) -> &mut CommonOptions {
        &mut self.common
    }
}

impl Endpoint for Delete {
    fn build(self) -> Result<http::Request<Body>> {
        let path = doc_path(&self.index, self.doc_type.as_deref(), Some(&self.id));

        let mut params = QueryParams::new();
        params.set_number("if_primary_term", self.if_primary_term);
        params.set_number("if_seq_no", self.if_seq_no);
        params.set_str("refresh", self.refresh.as_ref().map(Refresh::as_str));
        params.set_str("routing", self.routing.as_deref());
        params.set_duration("timeout", self.timeout);
        params.set_number("version", self.version);
        params.set_str("version_type", self.version_type.as_ref().map(VersionType::as_str));
        params.set_str("wait_for_active_shards", self.wait_for_active_shards.as_deref());

        RequestBuilder::new(Method::DELETE, path)
            .params(params)
            .options(self.common)
            .build()
    }
}
