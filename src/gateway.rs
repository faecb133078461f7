//! The gateway dispatcher: one ordered admission chain per request.
//!
//! Per request the chain is
//!
//! ```text
//! Received → CORS-checked → Admission-checked → [Auth-checked if protected]
//!         → Routed | Rejected(401 | 429) | NotFound(404)
//! ```
//!
//! Exactly one terminal response per request: every stage either passes the
//! request on or produces the response itself, never both. Rejections are
//! responses, not errors — nothing propagates past the dispatcher.

use std::sync::{Arc, OnceLock};

use http::{Method, StatusCode};
use tracing::{debug, warn};

use crate::auth::TokenVerifier;
use crate::config::GatewayConfig;
use crate::cors::CorsPolicy;
use crate::handler::Handler;
use crate::limit::{AdmissionPolicy, AdmissionStore, MemoryStore};
use crate::registry;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

/// The discovery endpoint, mounted automatically on every gateway.
const DISCOVERY_PATH: &str = "/api";

/// Collects routes and policies, then freezes them into a [`Gateway`].
///
/// Three route categories exist: public routes, protected routes (gated by
/// the token verifier), and the implicit 404 fallback for everything else.
pub struct GatewayBuilder {
    router: Router,
    policy: AdmissionPolicy,
    store: Option<Arc<dyn AdmissionStore>>,
}

impl GatewayBuilder {
    fn new() -> Self {
        Self { router: Router::new(), policy: AdmissionPolicy::default(), store: None }
    }

    /// Mounts an unauthenticated route.
    pub fn route(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.router.add(method, path, handler, false);
        self
    }

    /// Mounts a route behind the token verifier. The handler only runs for
    /// requests carrying a valid, unexpired bearer credential, and receives
    /// the decoded [`IdentityClaim`](crate::IdentityClaim) on the request.
    pub fn protected(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.router.add(method, path, handler, true);
        self
    }

    /// Overrides the default admission budget (50 requests / 10 minutes).
    pub fn admission_policy(mut self, policy: AdmissionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Swaps the in-process counter store for a shared one, e.g. when
    /// several gateway instances must enforce one budget.
    pub fn admission_store(mut self, store: Arc<dyn AdmissionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Freezes the chain: resolves the CORS profile, builds the verifier,
    /// mounts the discovery endpoint, and memoizes the discovery list.
    pub fn build(mut self, config: &GatewayConfig) -> Gateway {
        let endpoints: Arc<OnceLock<Arc<Vec<String>>>> = Arc::new(OnceLock::new());

        let list = Arc::clone(&endpoints);
        self.router.add(
            Method::GET,
            DISCOVERY_PATH,
            move |_req: Request| {
                let list = list.get().cloned().unwrap_or_default();
                async move {
                    match serde_json::to_vec(list.as_slice()) {
                        Ok(body) => Response::json(body),
                        Err(_) => Response::status(StatusCode::INTERNAL_SERVER_ERROR),
                    }
                }
            },
            false,
        );

        // The route table is static from here on; compute the discovery
        // list once and let the handler above serve the memoized copy.
        let discovered = Arc::new(registry::discover(
            self.router.descriptors(),
            &config.base_url(),
        ));
        let _ = endpoints.set(Arc::clone(&discovered));

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new(self.policy)));

        Gateway {
            cors: CorsPolicy::from_config(config),
            policy: self.policy,
            store,
            verifier: TokenVerifier::new(&config.token_secret),
            router: self.router,
            endpoints: discovered,
        }
    }
}

/// The assembled admission chain. Immutable; shared across all in-flight
/// requests.
pub struct Gateway {
    cors: CorsPolicy,
    policy: AdmissionPolicy,
    store: Arc<dyn AdmissionStore>,
    verifier: TokenVerifier,
    router: Router,
    endpoints: Arc<Vec<String>>,
}

impl Gateway {
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::new()
    }

    /// The statically declared route table.
    pub fn routes(&self) -> &[crate::router::RouteDescriptor] {
        self.router.descriptors()
    }

    /// The memoized discovery list served by `GET /api`.
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Runs one request through the chain and produces its one response.
    pub async fn handle(&self, mut req: Request) -> Response {
        // Preflight never reaches admission counters or handlers.
        if CorsPolicy::is_preflight(req.method()) {
            return self.cors.preflight_response();
        }

        let key = req.client_key();
        let verdict = self.store.increment(&key);
        if !verdict.admitted {
            warn!(client = %key, limit = self.policy.max_requests, "rate limit exceeded");
            return self.finish(self.rate_limited(verdict.retry_after));
        }

        let Some(matched) = self.router.lookup(req.method(), req.path()) else {
            debug!(method = %req.method(), path = %req.path(), "no route");
            return self.finish(Self::not_found());
        };

        if matched.protected {
            match self.verifier.verify(req.header("authorization")) {
                Ok(claim) => req.identity = Some(claim),
                Err(reason) => {
                    // One user-visible 401 for every failure class; the
                    // distinction stays in the log.
                    warn!(client = %key, ?reason, path = %req.path(), "unauthorized");
                    return self.finish(Self::unauthorized());
                }
            }
        }

        req.params = matched.params;
        let response = matched.handler.call(req).await;
        self.finish(response)
    }

    /// Every non-preflight response leaves through here, so the CORS
    /// policy is advertised exactly once on each.
    fn finish(&self, mut res: Response) -> Response {
        self.cors.apply(&mut res);
        res
    }

    fn unauthorized() -> Response {
        Response::builder()
            .status(StatusCode::UNAUTHORIZED)
            .json(br#"{"message":"unauthorized"}"#.to_vec())
    }

    fn not_found() -> Response {
        Response::builder()
            .status(StatusCode::NOT_FOUND)
            .json(br#"{"message":"not found"}"#.to_vec())
    }

    fn rate_limited(&self, retry_after: std::time::Duration) -> Response {
        let body = serde_json::json!({ "message": self.policy.exceeded_message() });
        Response::builder()
            .status(StatusCode::TOO_MANY_REQUESTS)
            .header("retry-after", &retry_after.as_secs().to_string())
            .header("x-ratelimit-limit", &self.policy.max_requests.to_string())
            .json(body.to_string().into_bytes())
    }
}
