//! # turnstile
//!
//! A request-admission gateway for HTTP APIs. Every inbound request is
//! answered three questions before any business logic runs: is it within
//! rate budget, is its origin permitted, and — on protected routes — is it
//! authenticated.
//!
//! ## The chain
//!
//! ```text
//! Received → CORS → Admission → [Token verification] → Routed
//!                                                    | 401 | 404 | 429
//! ```
//!
//! - **CORS enforcer** — one environment-selected profile; answers
//!   preflight `OPTIONS` itself, advertises the allowed origin on every
//!   other response.
//! - **Admission controller** — fixed-window counters per client address;
//!   overflow gets 429 with the configured limit in the body. The counter
//!   store is injectable for multi-instance deployments.
//! - **Token verifier** — HS256 bearer credentials checked against a
//!   shared secret; protected handlers receive the decoded
//!   [`IdentityClaim`]. Every failure path fails closed with one uniform
//!   401.
//! - **Endpoint registry** — `GET /api` lists the mounted flat routes,
//!   fully qualified for the active deployment.
//!
//! The gateway does not issue tokens, does not persist counters across
//! restarts, and makes no authorization decisions beyond "token present
//! and valid" — those belong to the issuer and the handlers behind it.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use http::Method;
//! use turnstile::{Gateway, GatewayConfig, Request, Response, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), turnstile::Error> {
//!     let config = GatewayConfig::from_env()?;
//!
//!     let gateway = Gateway::builder()
//!         .route(Method::POST, "/api/login", login)
//!         .protected(Method::GET, "/api/v1/courses", list_courses)
//!         .build(&config);
//!
//!     Server::bind(&format!("0.0.0.0:{}", config.listen_port))
//!         .serve(gateway)
//!         .await
//! }
//!
//! async fn login(_req: Request) -> Response {
//!     Response::json(br#"{"token":"..."}"#.to_vec())
//! }
//!
//! async fn list_courses(req: Request) -> Response {
//!     let who = &req.identity().unwrap().subject_id;
//!     Response::json(format!(r#"{{"owner":"{who}"}}"#).into_bytes())
//! }
//! ```

mod auth;
mod config;
mod cors;
mod error;
mod gateway;
mod handler;
mod limit;
mod registry;
mod request;
mod response;
mod router;
mod server;

pub use auth::{AuthError, Claims, IdentityClaim, TokenVerifier};
pub use config::{DeploymentMode, GatewayConfig};
pub use cors::CorsPolicy;
pub use error::Error;
pub use gateway::{Gateway, GatewayBuilder};
pub use handler::Handler;
pub use limit::{Admission, AdmissionPolicy, AdmissionStore, MemoryStore};
pub use request::Request;
pub use response::{IntoResponse, Response};
pub use router::RouteDescriptor;
pub use server::Server;

/// Re-exported for handler signatures and route registration.
pub use http::{Method, StatusCode};
