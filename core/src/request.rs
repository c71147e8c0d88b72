//! Request assembly shared by every endpoint.
//!
//! # Design
//! An endpoint contributes its method, path and endpoint-specific query
//! parameters. Everything else is the same for every operation and lives here:
//! the cross-cutting options (`pretty`, `human`, `error_trace`, `filter_path`,
//! extra headers, `X-Opaque-Id`, cancellation), JSON content-type injection,
//! header merging and query-string replacement.

use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use http::uri::{PathAndQuery, Uri};
use http::Method;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::error::Result;
use crate::http::{Body, Transport};
use crate::params::QueryParams;
use crate::response::Response;

pub const OPAQUE_ID: HeaderName = HeaderName::from_static("x-opaque-id");

const JSON: HeaderValue = HeaderValue::from_static("application/json");

/// Options accepted by every endpoint.
#[derive(Debug, Clone, Default)]
pub struct CommonOptions {
    pub pretty: bool,
    pub human: bool,
    pub error_trace: bool,
    pub filter_path: Vec<String>,
    pub headers: HeaderMap,
    pub opaque_id: Option<String>,
    pub cancellation: Option<CancellationToken>,
}

impl CommonOptions {
    fn apply(&self, params: &mut QueryParams) {
        params.set_flag("pretty", self.pretty);
        params.set_flag("human", self.human);
        params.set_flag("error_trace", self.error_trace);
        params.set_list("filter_path", &self.filter_path);
    }
}

/// Chainable setters for the options every endpoint shares.
///
/// Endpoints only provide access to their `CommonOptions`.
pub trait CommonParams: Sized {
    fn common_mut(&mut self) -> &mut CommonOptions;

    /// Ask the server to pretty-print its JSON.
    fn pretty(mut self) -> Self {
        self.common_mut().pretty = true;
        self
    }

    /// Ask for human-readable units in the response.
    fn human(mut self) -> Self {
        self.common_mut().human = true;
        self
    }

    /// Include stack traces in error responses.
    fn error_trace(mut self) -> Self {
        self.common_mut().error_trace = true;
        self
    }

    /// Restrict the response to the given paths.
    fn filter_path<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.common_mut().filter_path = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Add one extra header. Repeating the call for the same name adds
    /// another value.
    fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.common_mut().headers.append(name, value);
        self
    }

    /// Replace all extra headers.
    fn headers(mut self, headers: HeaderMap) -> Self {
        self.common_mut().headers = headers;
        self
    }

    /// Set the `X-Opaque-Id` tracing header.
    fn opaque_id(mut self, id: impl Into<String>) -> Self {
        self.common_mut().opaque_id = Some(id.into());
        self
    }

    /// Bind the request to a cancellation token.
    fn cancellation(mut self, token: CancellationToken) -> Self {
        self.common_mut().cancellation = Some(token);
        self
    }
}

/// One API operation that can turn itself into an HTTP request.
pub trait Endpoint: Sized {
    fn build(self) -> Result<http::Request<Body>>;

    /// Build the request and perform it on `transport`.
    ///
    /// A non-2xx response is returned as `Ok`; check `Response::is_error`.
    fn send<T: Transport + ?Sized>(self, transport: &T) -> Result<Response> {
        let request = self.build()?;
        let response = transport.perform(request)?;
        Ok(Response::from(response))
    }
}

/// Assembles a transport-ready request from its parts.
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    path: String,
    params: QueryParams,
    body: Option<Body>,
    options: CommonOptions,
}

impl RequestBuilder {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: QueryParams::new(),
            body: None,
            options: CommonOptions::default(),
        }
    }

    pub fn params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    pub fn body(mut self, body: Option<Body>) -> Self {
        self.body = body;
        self
    }

    pub fn options(mut self, options: CommonOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Result<http::Request<Body>> {
        let RequestBuilder {
            method,
            path,
            mut params,
            body,
            options,
        } = self;

        options.apply(&mut params);

        let mut request = http::Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())?;

        if !params.is_empty() {
            let uri = replace_query(request.uri().clone(), &params)?;
            *request.uri_mut() = uri;
        }

        if let Some(body) = body {
            request.headers_mut().insert(CONTENT_TYPE, JSON);
            *request.body_mut() = body;
        }

        merge_headers(request.headers_mut(), options.headers);

        if let Some(id) = options.opaque_id {
            let value = HeaderValue::try_from(id).map_err(http::Error::from)?;
            request.headers_mut().insert(OPAQUE_ID, value);
        }

        if let Some(token) = options.cancellation {
            request.extensions_mut().insert(token);
        }

        trace!("Built request. Method={} Uri={}", request.method(), request.uri());

        Ok(request)
    }
}

/// Merge caller headers into `target`.
///
/// An empty `target` takes `extra` over wholesale. Otherwise every value in
/// `extra` is appended, so existing values for the same name are kept.
pub fn merge_headers(target: &mut HeaderMap, extra: HeaderMap) {
    if extra.is_empty() {
        return;
    }
    if target.is_empty() {
        *target = extra;
        return;
    }
    let mut current: Option<HeaderName> = None;
    for (name, value) in extra {
        if let Some(name) = name {
            current = Some(name);
        }
        if let Some(name) = &current {
            target.append(name.clone(), value);
        }
    }
}

/// Replace the query string of `uri` with the encoded `params`.
///
/// Whatever query `uri` carried before is dropped, not merged.
pub fn replace_query(uri: Uri, params: &QueryParams) -> Result<Uri> {
    let mut parts = uri.into_parts();
    let path = parts
        .path_and_query
        .as_ref()
        .map(PathAndQuery::path)
        .unwrap_or("/");
    let path_and_query = if params.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", params.encode())
    };
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).map_err(http::Error::from)?);
    Ok(Uri::from_parts(parts).map_err(http::Error::from)?)
}

/// The cancellation token bound to `request`, if any.
pub fn cancellation<B>(request: &http::Request<B>) -> Option<&CancellationToken> {
    request.extensions().get::<CancellationToken>()
}
