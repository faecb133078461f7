//! Route table: radix-tree matching plus an explicit descriptor list.
//!
//! One matchit tree per HTTP method gives O(path-length) lookup. Alongside
//! the trees the router keeps a statically declared [`RouteDescriptor`]
//! table, so the endpoint registry reads a plain list instead of reflecting
//! over the matcher. Both are frozen when the gateway is built.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};

/// One mounted route, as the registry sees it: the path pattern and the
/// methods registered on it.
#[derive(Clone, Debug)]
pub struct RouteDescriptor {
    pub path: String,
    pub methods: Vec<Method>,
}

/// A registered handler plus its admission requirements.
struct Route {
    handler: BoxedHandler,
    protected: bool,
}

/// A successful lookup: what to run and under what conditions.
pub(crate) struct RouteMatch {
    pub(crate) handler: BoxedHandler,
    pub(crate) params: HashMap<String, String>,
    pub(crate) protected: bool,
}

/// The gateway's route table.
pub(crate) struct Router {
    trees: HashMap<Method, MatchitRouter<Route>>,
    descriptors: Vec<RouteDescriptor>,
}

impl Router {
    pub(crate) fn new() -> Self {
        Self { trees: HashMap::new(), descriptors: Vec::new() }
    }

    /// Registers a handler. Panics on a malformed or conflicting pattern —
    /// routes are declared at boot, so this is a programming error, not a
    /// runtime condition.
    pub(crate) fn add(
        &mut self,
        method: Method,
        path: &str,
        handler: impl Handler,
        protected: bool,
    ) {
        let route = Route { handler: handler.into_boxed_handler(), protected };
        self.trees
            .entry(method.clone())
            .or_default()
            .insert(path, route)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));

        match self.descriptors.iter_mut().find(|d| d.path == path) {
            Some(descriptor) => {
                if !descriptor.methods.contains(&method) {
                    descriptor.methods.push(method);
                }
            }
            None => self.descriptors.push(RouteDescriptor {
                path: path.to_owned(),
                methods: vec![method],
            }),
        }
    }

    pub(crate) fn lookup(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        let tree = self.trees.get(method)?;
        let matched = tree.at(path).ok()?;
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some(RouteMatch {
            handler: Arc::clone(&matched.value.handler),
            params,
            protected: matched.value.protected,
        })
    }

    /// The static route table, in declaration order.
    pub(crate) fn descriptors(&self) -> &[RouteDescriptor] {
        &self.descriptors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;
    use crate::response::Response;

    async fn noop(_req: Request) -> Response {
        Response::text("ok")
    }

    #[test]
    fn lookup_matches_method_and_path() {
        let mut router = Router::new();
        router.add(Method::GET, "/api/v1/courses", noop, true);

        assert!(router.lookup(&Method::GET, "/api/v1/courses").is_some());
        assert!(router.lookup(&Method::POST, "/api/v1/courses").is_none());
        assert!(router.lookup(&Method::GET, "/api/v1/nope").is_none());
    }

    #[test]
    fn lookup_captures_params_and_protection() {
        let mut router = Router::new();
        router.add(Method::GET, "/api/v1/courses/{id}", noop, true);

        let matched = router
            .lookup(&Method::GET, "/api/v1/courses/42")
            .expect("route should match");
        assert_eq!(matched.params.get("id").map(String::as_str), Some("42"));
        assert!(matched.protected);
    }

    #[test]
    fn descriptors_merge_methods_per_path() {
        let mut router = Router::new();
        router.add(Method::GET, "/api/v1/courses", noop, true);
        router.add(Method::POST, "/api/v1/courses", noop, true);
        router.add(Method::GET, "/api", noop, false);

        let descriptors = router.descriptors();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].path, "/api/v1/courses");
        assert_eq!(descriptors[0].methods, vec![Method::GET, Method::POST]);
        assert_eq!(descriptors[1].path, "/api");
    }
}
