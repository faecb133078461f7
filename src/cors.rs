//! Cross-origin policy enforcement.
//!
//! One static profile per process, resolved from [`GatewayConfig`] at boot.
//! Preflight `OPTIONS` requests are answered here and never reach a
//! handler; every other response gets the allow-origin header attached.
//! The gateway does not hard-reject mismatched origins — it advertises
//! policy and the browser enforces it.

use http::{Method, StatusCode};

use crate::config::GatewayConfig;
use crate::response::Response;

const ALLOWED_METHODS: &str = "GET, POST, PATCH, PUT, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "Origin, Content-Type, X-Auth-Token, Authorization";

/// The active CORS profile. Immutable after startup.
#[derive(Clone, Debug)]
pub struct CorsPolicy {
    allowed_origin: String,
    allowed_methods: &'static str,
    allowed_headers: &'static str,
}

impl CorsPolicy {
    pub(crate) fn from_config(config: &GatewayConfig) -> Self {
        Self {
            allowed_origin: config.allowed_origin.clone(),
            allowed_methods: ALLOWED_METHODS,
            allowed_headers: ALLOWED_HEADERS,
        }
    }

    pub fn allowed_origin(&self) -> &str {
        &self.allowed_origin
    }

    pub(crate) fn is_preflight(method: &Method) -> bool {
        method == Method::OPTIONS
    }

    /// Answers a preflight request with the full allow-list. 204, no body,
    /// no downstream handler involved.
    pub(crate) fn preflight_response(&self) -> Response {
        let mut res = Response::status(StatusCode::NO_CONTENT);
        res.append_header("access-control-allow-origin", &self.allowed_origin);
        res.append_header("access-control-allow-methods", self.allowed_methods);
        res.append_header("access-control-allow-headers", self.allowed_headers);
        res.append_header("vary", "origin");
        res
    }

    /// Decorates a non-preflight response with the advertised origin.
    pub(crate) fn apply(&self, res: &mut Response) {
        res.append_header("access-control-allow-origin", &self.allowed_origin);
        res.append_header("vary", "origin");
    }
}
