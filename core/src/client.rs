//! A transport bound to a set of default headers.
//!
//! # Design
//! `Client` holds nothing but a transport and the headers every request
//! should carry (user agent, auth token, tenant id, ...). It keeps no state
//! between calls. `build` produces the request without performing it, so a
//! caller can still run the round-trip itself.

use http::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use crate::error::Result;
use crate::http::{Body, Transport};
use crate::request::Endpoint;
use crate::response::Response;

#[derive(Debug, Clone)]
pub struct Client<T> {
    transport: T,
    headers: HeaderMap,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            headers: HeaderMap::new(),
        }
    }

    /// Add a header sent with every request. Headers set on the endpoint
    /// itself take precedence.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build<E: Endpoint>(&self, endpoint: E) -> Result<http::Request<Body>> {
        let mut request = endpoint.build()?;
        for name in self.headers.keys() {
            if request.headers().contains_key(name) {
                continue;
            }
            for value in self.headers.get_all(name) {
                request.headers_mut().append(name.clone(), value.clone());
            }
        }
        Ok(request)
    }

    /// Build and perform `endpoint`. Non-2xx responses are returned as `Ok`.
    pub fn send<E: Endpoint>(&self, endpoint: E) -> Result<Response> {
        let request = self.build(endpoint)?;
        debug!("Sending request. Method={} Uri={}", request.method(), request.uri());
        let response = Response::from(self.transport.perform(request)?);
        debug!("Received response. Status={}", response.status());
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use http::header::{AUTHORIZATION, USER_AGENT};
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::api::{Get, Info};
    use crate::http::{TransportError, TransportFn};
    use crate::request::{cancellation, CommonParams};

    type Handler = fn(http::Request<Body>) -> std::result::Result<http::Response<Body>, TransportError>;

    fn ok(_req: http::Request<Body>) -> std::result::Result<http::Response<Body>, TransportError> {
        Ok(http::Response::builder()
            .status(200)
            .body(Body::from("{}"))
            .unwrap())
    }

    fn client() -> Client<TransportFn<Handler>> {
        Client::new(TransportFn(ok as Handler))
            .with_header(USER_AGENT, HeaderValue::from_static("osapi/0.1"))
    }

    #[test]
    fn default_headers_are_added() {
        let req = client().build(Info::new()).unwrap();
        assert_eq!(req.headers()[USER_AGENT], "osapi/0.1");
    }

    #[test]
    fn endpoint_headers_take_precedence() {
        let req = client()
            .build(Info::new().header(USER_AGENT, HeaderValue::from_static("custom")))
            .unwrap();
        let values: Vec<_> = req.headers().get_all(USER_AGENT).iter().collect();
        assert_eq!(values, vec!["custom"]);
    }

    #[test]
    fn send_returns_wrapped_response() {
        let resp = client().send(Get::new("products", "42")).unwrap();
        assert_eq!(resp.status(), 200);
        assert!(!resp.is_error());
    }

    #[test]
    fn send_passes_request_to_transport() {
        let seen = RefCell::new(Vec::new());
        let transport = TransportFn(|req: http::Request<Body>| {
            seen.borrow_mut().push((
                req.method().clone(),
                req.uri().to_string(),
                req.headers().get(AUTHORIZATION).cloned(),
                cancellation(&req).is_some(),
            ));
            Ok::<_, TransportError>(
                http::Response::builder()
                    .status(404)
                    .body(Body::from(r#"{"found":false}"#))
                    .unwrap(),
            )
        });
        let client = Client::new(&transport)
            .with_header(AUTHORIZATION, HeaderValue::from_static("Bearer t0ken"));

        let resp = client
            .send(
                Get::new("products", "42")
                    .pretty()
                    .cancellation(CancellationToken::new()),
            )
            .unwrap();

        assert!(resp.is_error());
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, http::Method::GET);
        assert_eq!(seen[0].1, "/products/_doc/42?pretty=true");
        assert_eq!(seen[0].2.as_ref().unwrap(), "Bearer t0ken");
        assert!(seen[0].3);
    }

    #[test]
    fn transport_errors_pass_through() {
        let transport = TransportFn(|_req: http::Request<Body>| {
            Err::<http::Response<Body>, _>(TransportError::new("connection refused"))
        });
        let err = Client::new(transport).send(Info::new()).unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "transport error: connection refused");
    }

    #[test]
    fn build_errors_are_not_sent() {
        let calls = RefCell::new(0);
        let transport = TransportFn(|_req: http::Request<Body>| {
            *calls.borrow_mut() += 1;
            Err::<http::Response<Body>, _>(TransportError::new("unreachable"))
        });
        let err = Client::new(&transport)
            .send(Info::new().opaque_id("bad\r\nid"))
            .unwrap_err();
        assert!(err.is_build());
        assert_eq!(*calls.borrow(), 0);
    }
}
