//! Startup and infrastructure errors.
//!
//! Request-path failures (401, 429, 404) are expressed as HTTP
//! [`Response`](crate::Response) values and never surface here. This type
//! covers the failures that abort startup or tear down the listener:
//! binding a port, accepting a connection, missing configuration, or an
//! unreachable persistence layer.

use thiserror::Error;

/// The error type returned by turnstile's fallible operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Socket-level failure: bind or accept.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Required configuration is missing or unparseable.
    #[error("config: {0}")]
    Config(String),

    /// The persistence layer could not be reached at startup.
    ///
    /// Startup must abort rather than serve traffic it cannot back.
    #[error("upstream connection failed: {0}")]
    Upstream(String),
}
