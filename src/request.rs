//! Incoming HTTP request type.

use std::collections::HashMap;
use std::net::IpAddr;

use bytes::Bytes;
use http::{HeaderMap, Method};

use crate::auth::IdentityClaim;

/// An incoming HTTP request, as seen by handlers.
///
/// Carries everything the admission chain needs: the raw method, path,
/// headers and body, the captured path parameters, the peer address (the
/// default rate-limit key), and — on protected routes only — the verified
/// [`IdentityClaim`].
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
    pub(crate) peer: IpAddr,
    pub(crate) identity: Option<IdentityClaim>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: String,
        headers: HeaderMap,
        body: Bytes,
        peer: IpAddr,
    ) -> Self {
        Self {
            method,
            path,
            headers,
            body,
            params: HashMap::new(),
            peer,
            identity: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Header value as a string, if present and valid UTF-8.
    /// Lookup is case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/courses/{id}`, `req.param("id")` on `/courses/42`
    /// returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The peer network address this request arrived from.
    pub fn peer(&self) -> IpAddr {
        self.peer
    }

    /// The key admission counters are bucketed under.
    ///
    /// Many requests map to one key; by default the peer address.
    pub fn client_key(&self) -> String {
        self.peer.to_string()
    }

    /// The verified identity attached by the token verifier.
    ///
    /// `Some` on protected routes (verification already succeeded by the
    /// time the handler runs), `None` on public routes. Lives for this
    /// request only; never persisted.
    pub fn identity(&self) -> Option<&IdentityClaim> {
        self.identity.as_ref()
    }
}

#[cfg(test)]
impl Request {
    /// Test-only constructor with a loopback peer and empty body.
    pub(crate) fn test(method: Method, path: &str) -> Self {
        Self::new(
            method,
            path.to_owned(),
            HeaderMap::new(),
            Bytes::new(),
            IpAddr::from([127, 0, 0, 1]),
        )
    }

    pub(crate) fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(
            http::header::HeaderName::from_bytes(name.as_bytes()).unwrap(),
            http::header::HeaderValue::from_str(value).unwrap(),
        );
        self
    }
}
