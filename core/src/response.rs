//! Response wrapper.

use std::fmt::Write as _;

use bytes::Bytes;
use http::header::WARNING;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::http::Body;

/// A response as returned by the transport, body untouched.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Body,
}

impl From<http::Response<Body>> for Response {
    fn from(response: http::Response<Body>) -> Self {
        let (parts, body) = response.into_parts();
        Self {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }
}

impl Response {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn into_body(self) -> Body {
        self.body
    }

    /// True for any status above 299, redirects included.
    pub fn is_error(&self) -> bool {
        self.status.as_u16() > 299
    }

    /// Deprecation warnings sent by the server, one entry per `Warning` value.
    pub fn warnings(&self) -> Vec<String> {
        self.headers
            .get_all(WARNING)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect()
    }

    pub fn has_warnings(&self) -> bool {
        self.headers.contains_key(WARNING)
    }

    /// Render `[<code> <reason>] <body>` for logs.
    ///
    /// The body is buffered and put back, so it can still be read in full
    /// afterwards.
    pub fn debug_string(&mut self) -> String {
        let mut out = format!(
            "[{} {}]",
            self.status.as_u16(),
            self.status.canonical_reason().unwrap_or("")
        );
        match self.body.buffer() {
            Ok(bytes) if bytes.is_empty() => {}
            Ok(bytes) => {
                out.push(' ');
                out.push_str(&String::from_utf8_lossy(&bytes));
            }
            Err(err) => {
                let _ = write!(out, " <error reading response body: {err}>");
            }
        }
        out
    }

    pub fn bytes(self) -> Result<Bytes> {
        Ok(self.body.into_bytes()?)
    }

    pub fn text(self) -> Result<String> {
        let bytes = self.bytes()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        let bytes = self.bytes()?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Turn a non-2xx response into `Error::Status`.
    pub fn error_for_status(self) -> Result<Self> {
        if !self.is_error() {
            return Ok(self);
        }
        let status = self.status;
        let body = self.text()?;
        Err(Error::Status { status, body })
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use super::*;

    fn response(status: u16, body: Body) -> Response {
        http::Response::builder()
            .status(status)
            .body(body)
            .unwrap()
            .into()
    }

    #[test]
    fn is_error_boundaries() {
        assert!(!response(200, Body::empty()).is_error());
        assert!(!response(299, Body::empty()).is_error());
        assert!(response(300, Body::empty()).is_error());
        assert!(response(404, Body::empty()).is_error());
        assert!(response(500, Body::empty()).is_error());
    }

    #[test]
    fn warnings_empty_when_absent() {
        let resp = response(200, Body::empty());
        assert!(resp.warnings().is_empty());
        assert!(!resp.has_warnings());
    }

    #[test]
    fn warnings_returns_every_value() {
        let resp: Response = http::Response::builder()
            .status(200)
            .header(WARNING, r#"299 OpenSearch-2.11.0 "first""#)
            .header(WARNING, r#"299 OpenSearch-2.11.0 "second""#)
            .body(Body::empty())
            .unwrap()
            .into();
        assert!(resp.has_warnings());
        assert_eq!(
            resp.warnings(),
            vec![
                r#"299 OpenSearch-2.11.0 "first""#.to_string(),
                r#"299 OpenSearch-2.11.0 "second""#.to_string()
            ]
        );
    }

    #[test]
    fn debug_string_leaves_body_readable() {
        let mut resp = response(200, Body::from_reader(Cursor::new(b"{\"ok\":true}".to_vec())));
        assert_eq!(resp.debug_string(), r#"[200 OK] {"ok":true}"#);

        let mut body = Vec::new();
        resp.body_mut().read_to_end(&mut body).unwrap();
        assert_eq!(body, b"{\"ok\":true}");
    }

    #[test]
    fn debug_string_can_be_called_twice() {
        let mut resp = response(404, Body::from(r#"{"found":false}"#));
        let first = resp.debug_string();
        let second = resp.debug_string();
        assert_eq!(first, second);
        assert_eq!(first, r#"[404 Not Found] {"found":false}"#);
        assert_eq!(resp.text().unwrap(), r#"{"found":false}"#);
    }

    #[test]
    fn debug_string_without_body() {
        let mut resp = response(200, Body::empty());
        assert_eq!(resp.debug_string(), "[200 OK]");
    }

    #[test]
    fn debug_string_reports_read_errors() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "reset"))
            }
        }
        let mut resp = response(200, Body::from_reader(Broken));
        assert_eq!(
            resp.debug_string(),
            "[200 OK] <error reading response body: reset>"
        );
    }

    #[test]
    fn debug_string_read_error_keeps_partial_body() {
        struct FailsAfterHead {
            failed: bool,
            rest: &'static [u8],
        }
        impl Read for FailsAfterHead {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if !self.failed {
                    self.failed = true;
                    return Err(std::io::Error::new(std::io::ErrorKind::Other, "reset"));
                }
                let n = self.rest.len().min(buf.len());
                buf[..n].copy_from_slice(&self.rest[..n]);
                self.rest = &self.rest[n..];
                Ok(n)
            }
        }
        let head = Cursor::new(b"{\"ok\"".to_vec());
        let tail = FailsAfterHead {
            failed: false,
            rest: b":true}",
        };
        let mut resp = response(200, Body::from_reader(head.chain(tail)));
        assert_eq!(
            resp.debug_string(),
            "[200 OK] <error reading response body: reset>"
        );
        assert_eq!(resp.text().unwrap(), r#"{"ok":true}"#);
    }

    #[test]
    fn json_decodes_body() {
        let resp = response(200, Body::from(r#"{"acknowledged":true}"#));
        let value: serde_json::Value = resp.json().unwrap();
        assert_eq!(value["acknowledged"], true);
    }

    #[test]
    fn json_reports_decode_errors() {
        let resp = response(200, Body::from("not json"));
        let err = resp.json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn error_for_status_passes_success_through() {
        let resp = response(201, Body::from("{}")).error_for_status().unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[test]
    fn error_for_status_carries_status_and_body() {
        let err = response(404, Body::from(r#"{"found":false}"#))
            .error_for_status()
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        match err {
            Error::Status { body, .. } => assert_eq!(body, r#"{"found":false}"#),
            other => panic!("unexpected error: {other}"),
        }
    }
}
