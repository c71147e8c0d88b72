use std::time::Duration;

use http::Method;

use crate::error::Result;
use crate::http::Body;
use crate::params::QueryParams;
use crate::path::PathBuilder;
use crate::request::{CommonOptions, CommonParams, Endpoint, RequestBuilder};

/// `GET /`
#[derive(Debug, Clone, Default)]
pub struct Info {
    common: CommonOptions,
}

impl Info {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommonParams for Info {
    fn common_mut(&mut self) -> &mut CommonOptions {
        &mut self.common
    }
}

impl Endpoint for Info {
    fn build(self) -> Result<http::Request<Body>> {
        RequestBuilder::new(Method::GET, "/")
            .options(self.common)
            .build()
    }
}

/// `HEAD /`
#[derive(Debug, Clone, Default)]
pub struct Ping {
    common: CommonOptions,
}

impl Ping {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommonParams for Ping {
    fn common_mut(&mut self) -> &mut CommonOptions {
        &mut self.common
    }
}

impl Endpoint for Ping {
    fn build(self) -> Result<http::Request<Body>> {
        RequestBuilder::new(Method::HEAD, "/")
            .options(self.common)
            .build()
    }
}

/// `GET /_cluster/health[/{index}]`
#[derive(Debug, Clone, Default)]
pub struct ClusterHealth {
    indices: Vec<String>,
    cluster_manager_timeout: Option<Duration>,
    expand_wildcards: Vec<String>,
    level: Option<String>,
    local: Option<bool>,
    master_timeout: Option<Duration>,
    timeout: Option<Duration>,
    wait_for_active_shards: Option<String>,
    wait_for_events: Option<String>,
    wait_for_no_initializing_shards: Option<bool>,
    wait_for_no_relocating_shards: Option<bool>,
    wait_for_nodes: Option<String>,
    wait_for_status: Option<String>,
    common: CommonOptions,
}

impl ClusterHealth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the report to these indices.
    pub fn index<I: IntoIterator<Item = S>, S: Into<String>>(mut self, indices: I) -> Self {
        self.indices = indices.into_iter().map(Into::into).collect();
        self
    }

    pub fn cluster_manager_timeout(mut self, timeout: Duration) -> Self {
        self.cluster_manager_timeout = Some(timeout);
        self
    }

    pub fn expand_wildcards<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.expand_wildcards = values.into_iter().map(Into::into).collect();
        self
    }

    /// `cluster`, `indices` or `shards`.
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn local(mut self, local: bool) -> Self {
        self.local = Some(local);
        self
    }

    #[deprecated(note = "use cluster_manager_timeout")]
    pub fn master_timeout(mut self, timeout: Duration) -> Self {
        self.master_timeout = Some(timeout);
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

    pub fn wait_for_events(mut self, priority: impl Into<String>) -> Self {
        self.wait_for_events = Some(priority.into());
        self
    }

    pub fn wait_for_no_initializing_shards(mut self, wait: bool) -> Self {
        self.wait_for_no_initializing_shards = Some(wait);
        self
    }

    pub fn wait_for_no_relocating_shards(mut self, wait: bool) -> Self {
        self.wait_for_no_relocating_shards = Some(wait);
        self
    }

    pub fn wait_for_nodes(mut self, nodes: impl Into<String>) -> Self {
        self.wait_for_nodes = Some(nodes.into());
        self
    }

    /// `green`, `yellow` or `red`.
    pub fn wait_for_status(mut self, status: impl Into<String>) -> Self {
        self.wait_for_status = Some(status.into());
        self
    }
}

impl CommonParams for ClusterHealth {
    fn common_mut(&mut self) -> &mut CommonOptions {
        &mut self.common
    }
}

impl Endpoint for ClusterHealth {
    fn build(self) -> Result<http::Request<Body>> {
        let path = PathBuilder::new()
            .literal("_cluster")
            .literal("health")
            .optional_list(&self.indices)
            .build();

        let mut params = QueryParams::new();
        params.set_duration("cluster_manager_timeout", self.cluster_manager_timeout);
        params.set_list("expand_wildcards", &self.expand_wildcards);
        params.set_str("level", self.level.as_deref());
        params.set_bool("local", self.local);
        params.set_duration("master_timeout", self.master_timeout);
        params.set_duration("timeout", self.timeout);
        params.set_str("wait_for_active_shards", self.wait_for_active_shards.as_deref());
        params.set_str("wait_for_events", self.wait_for_events.as_deref());
        params.set_bool("wait_for_no_initializing_shards", self.wait_for_no_initializing_shards);
        params.set_bool("wait_for_no_relocating_shards", self.wait_for_no_relocating_shards);
        params.set_str("wait_for_nodes", self.wait_for_nodes.as_deref());
        params.set_str("wait_for_status", self.wait_for_status.as_deref());

        RequestBuilder::new(Method::GET, path)
            .params(params)
            .options(self.common)
            .build()
    }
}
