use std::time::Duration;

use http::Method;

use crate::error::Result;
use crate::http::Body;
use crate::params::QueryParams;
use crate::path::PathBuilder;
use crate::request::{CommonOptions, CommonParams, Endpoint, RequestBuilder};

/// `GET /_template[/{name}]`
#[derive(Debug, Clone, Default)]
pub struct GetTemplate {
    names: Vec<String>,
    cluster_manager_timeout: Option<Duration>,
    flat_settings: Option<bool>,
    local: Option<bool>,
    common: CommonOptions,
}

impl GetTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Template names. Empty returns every template.
    pub fn name<I: IntoIterator<Item = S>, S: Into<String>>(mut self, names: I) -> Self {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn cluster_manager_timeout(mut self, timeout: Duration) -> Self {
        self.cluster_manager_timeout = Some(timeout);
        self
    }

    pub fn flat_settings(mut self, flat: bool) -> Self {
        self.flat_settings = Some(flat);
        self
    }

    pub fn local(mut self, local: bool) -> Self {
        self.local = Some(local);
        self
    }
}

impl CommonParams for GetTemplate {
    fn common_mut(&mut self) -> &mut CommonOptions {
        &mut self.common
    }
}

impl Endpoint for GetTemplate {
    fn build(self) -> Result<http::Request<Body>> {
        let path = PathBuilder::new()
            .literal("_template")
            .optional_list(&self.names)
            .build();

        let mut params = QueryParams::new();
        params.set_duration("cluster_manager_timeout", self.cluster_manager_timeout);
        params.set_bool("flat_settings", self.flat_settings);
        params.set_bool("local", self.local);

        RequestBuilder::new(Method::GET, path)
            .params(params)
            .options(self.common)
            .build()
    }
}

/// `PUT /_template/{name}`
#[derive(Debug)]
pub struct PutTemplate {
    name: String,
    body: Body,
    cluster_manager_timeout: Option<Duration>,
    create: Option<bool>,
    order: Option<i64>,
    common: CommonOptions,
}

impl PutTemplate {
    pub fn new(name: impl Into<String>, body: impl Into<Body>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
            cluster_manager_timeout: None,
            create: None,
            order: None,
            common: CommonOptions::default(),
        }
    }

    pub fn cluster_manager_timeout(mut self, timeout: Duration) -> Self {
        self.cluster_manager_timeout = Some(timeout);
        self
    }

    /// Fail instead of replacing an existing template.
    pub fn create(mut self, create: bool) -> Self {
        self.create = Some(create);
        self
    }

    pub fn order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }
}

impl CommonParams for PutTemplate {
    fn common_mut(&mut self) -> &mut CommonOptions {
        &mut self.common
    }
}

impl Endpoint for PutTemplate {
    fn build(self) -> Result<http::Request<Body>> {
        let path = PathBuilder::new()
            .literal("_template")
            .param(&self.name)
            .build();

        let mut params = QueryParams::new();
        params.set_duration("cluster_manager_timeout", self.cluster_manager_timeout);
        params.set_bool("create", self.create);
        params.set_number("order", self.order);

        RequestBuilder::new(Method::PUT, path)
            .params(params)
            .body(Some(self.body))
            .options(self.common)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_all_templates() {
        let req = GetTemplate::new().build().unwrap();
        assert_eq!(req.uri(), "/_template");
    }

    #[test]
    fn get_named_templates() {
        let req = GetTemplate::new()
            .name(["logs", "metrics"])
            .flat_settings(true)
            .build()
            .unwrap();
        assert_eq!(req.uri(), "/_template/logs,metrics?flat_settings=true");
    }

    #[test]
    fn put_template() {
        let req = PutTemplate::new("logs", r#"{"index_patterns":["logs-*"]}"#)
            .create(true)
            .order(0)
            .build()
            .unwrap();
        assert_eq!(req.method(), Method::PUT);
        assert_eq!(req.uri(), "/_template/logs?create=true&order=0");
        assert_eq!(req.headers()["content-type"], "application/json");
    }
}
