//! Incoming HTTP request type and the [`RequestContext`] capability.
//!
//! The protocol engine never touches a server type directly. It reads the
//! method, the request URI and headers through [`RequestContext`], which is
//! implemented for this crate's [`Request`] and for plain [`http`] requests,
//! so any framework built on the `http` crate can drive the engine.

use bytes::Bytes;
use http::request::Parts;
use http::{Extensions, HeaderMap, Method, Uri};

/// Read-only view of a request: everything the engine needs to know about it.
pub trait RequestContext {
    fn method(&self) -> &Method;
    fn uri(&self) -> &Uri;
    fn headers(&self) -> &HeaderMap;

    /// Header lookup by name (case-insensitive). Non-UTF-8 values read as absent.
    fn header(&self, name: &str) -> Option<&str> {
        self.headers().get(name).and_then(|v| v.to_str().ok())
    }

    /// The request URI as received: path plus query string.
    fn request_uri(&self) -> &str {
        let uri = self.uri();
        match uri.path_and_query() {
            Some(pq) => pq.as_str(),
            None => uri.path(),
        }
    }
}

/// An incoming HTTP request with its body fully buffered.
pub struct Request {
    pub(crate) parts: Parts,
    pub(crate) body: Bytes,
}

impl Request {
    pub fn new(parts: Parts, body: Bytes) -> Self {
        Self { parts, body }
    }

    pub fn method(&self) -> &Method { &self.parts.method }
    pub fn uri(&self) -> &Uri { &self.parts.uri }
    pub fn path(&self) -> &str { self.parts.uri.path() }
    pub fn headers(&self) -> &HeaderMap { &self.parts.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        RequestContext::header(self, name)
    }

    /// Typed per-request state. The inertia middleware stores the engine here.
    pub fn extensions(&self) -> &Extensions { &self.parts.extensions }
    pub fn extensions_mut(&mut self) -> &mut Extensions { &mut self.parts.extensions }
}

impl From<http::Request<Bytes>> for Request {
    fn from(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self { parts, body }
    }
}

impl RequestContext for Request {
    fn method(&self) -> &Method { &self.parts.method }
    fn uri(&self) -> &Uri { &self.parts.uri }
    fn headers(&self) -> &HeaderMap { &self.parts.headers }
}

impl<B> RequestContext for http::Request<B> {
    fn method(&self) -> &Method { self.method() }
    fn uri(&self) -> &Uri { self.uri() }
    fn headers(&self) -> &HeaderMap { self.headers() }
}

impl RequestContext for Parts {
    fn method(&self) -> &Method { &self.method }
    fn uri(&self) -> &Uri { &self.uri }
    fn headers(&self) -> &HeaderMap { &self.headers }
}
