//! Body and transport types for the request core.
//!
//! # Design
//! The core builds `http::Request<Body>` values and never opens a socket. A
//! `Transport` implementation supplied by the caller performs the round-trip
//! and hands back an `http::Response<Body>`. Connection pooling, retries, TLS
//! and authentication all live behind that one method.
//!
//! `Body` is a readable byte stream. It is either empty, an in-memory buffer,
//! or an arbitrary `Read` source, and can be buffered in place so a reader can
//! look at it without taking it away from the next reader.

use std::error::Error as StdError;
use std::fmt;
use std::io::{self, Cursor, Read};
use std::mem;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

/// A request or response body.
pub struct Body {
    inner: Inner,
}

enum Inner {
    Empty,
    Buffered(Cursor<Bytes>),
    Streaming(Box<dyn Read + Send>),
}

impl Body {
    pub fn empty() -> Self {
        Self { inner: Inner::Empty }
    }

    /// Wrap an arbitrary reader. Nothing is read until the body is consumed.
    pub fn from_reader(reader: impl Read + Send + 'static) -> Self {
        Self {
            inner: Inner::Streaming(Box::new(reader)),
        }
    }

    /// Serialize `value` as a JSON body.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_vec(value).map(Self::from)
    }

    /// True only for a body that was created empty. A streaming body is never
    /// considered empty because its length is unknown until it is read.
    pub fn is_empty(&self) -> bool {
        matches!(self.inner, Inner::Empty)
    }

    /// Read the remaining bytes and replace the stream with an in-memory copy
    /// positioned at its start. Subsequent reads see the same bytes again.
    ///
    /// If the underlying reader fails partway, the bytes read so far are kept
    /// in front of the rest of the stream, so a later reader still sees them.
    pub fn buffer(&mut self) -> io::Result<Bytes> {
        let bytes = match mem::replace(&mut self.inner, Inner::Empty) {
            Inner::Empty => return Ok(Bytes::new()),
            Inner::Buffered(cursor) => {
                let start = cursor.position() as usize;
                cursor.into_inner().slice(start..)
            }
            Inner::Streaming(mut reader) => {
                let mut buf = Vec::new();
                if let Err(err) = reader.read_to_end(&mut buf) {
                    let head = Cursor::new(Bytes::from(buf));
                    self.inner = Inner::Streaming(Box::new(head.chain(reader)));
                    return Err(err);
                }
                Bytes::from(buf)
            }
        };
        self.inner = Inner::Buffered(Cursor::new(bytes.clone()));
        Ok(bytes)
    }

    /// Consume the body and return everything that is left in it.
    pub fn into_bytes(mut self) -> io::Result<Bytes> {
        self.buffer()
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl Read for Body {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.inner {
            Inner::Empty => Ok(0),
            Inner::Buffered(cursor) => cursor.read(buf),
            Inner::Streaming(reader) => reader.read(buf),
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Inner::Empty => f.write_str("Body::Empty"),
            Inner::Buffered(cursor) => f
                .debug_struct("Body::Buffered")
                .field("len", &cursor.get_ref().len())
                .field("position", &cursor.position())
                .finish(),
            Inner::Streaming(_) => f.write_str("Body::Streaming"),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self {
            inner: Inner::Buffered(Cursor::new(bytes)),
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes::from(bytes).into()
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Bytes::from(text).into()
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Bytes::from_static(text.as_bytes()).into()
    }
}

impl From<&serde_json::Value> for Body {
    fn from(value: &serde_json::Value) -> Self {
        // Serializing a `Value` cannot fail: every key is already a string.
        Bytes::from(value.to_string()).into()
    }
}

/// Error returned by a `Transport` when the round-trip itself failed.
///
/// The core does not classify these; the source is carried through as-is.
#[derive(Debug, Error)]
#[error("transport error: {source}")]
pub struct TransportError {
    source: Box<dyn StdError + Send + Sync>,
}

impl TransportError {
    pub fn new(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn get_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.source.as_ref()
    }
}

/// Performs one HTTP request.
///
/// The request URI is in origin form (path and query only). Resolving it
/// against a host is the transport's job.
pub trait Transport {
    fn perform(&self, request: http::Request<Body>) -> Result<http::Response<Body>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn perform(&self, request: http::Request<Body>) -> Result<http::Response<Body>, TransportError> {
        (**self).perform(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn perform(&self, request: http::Request<Body>) -> Result<http::Response<Body>, TransportError> {
        (**self).perform(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn perform(&self, request: http::Request<Body>) -> Result<http::Response<Body>, TransportError> {
        (**self).perform(request)
    }
}

/// Adapts a closure into a `Transport`.
#[derive(Clone)]
pub struct TransportFn<F>(pub F);

impl<F> Transport for TransportFn<F>
where
    F: Fn(http::Request<Body>) -> Result<http::Response<Body>, TransportError>,
{
    fn perform(&self, request: http::Request<Body>) -> Result<http::Response<Body>, TransportError> {
        (self.0)(request)
    }
}

impl<F> fmt::Debug for TransportFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TransportFn")
    }
}
