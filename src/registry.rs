//! Endpoint discovery.
//!
//! Flattens the dispatcher's static route table into the list served by
//! `GET /api`: externally callable paths, fully qualified with the
//! deployment's base address. Parameterized routes (`/{id}`) make no sense
//! in a flat discovery list and are skipped, as is anything malformed.

use crate::router::RouteDescriptor;

/// Produces the discovery list, in declaration order.
///
/// Read-only over the route table; the gateway computes this once at build
/// time since the table is static after boot.
pub(crate) fn discover(routes: &[RouteDescriptor], base_url: &str) -> Vec<String> {
    routes
        .iter()
        .filter(|route| is_discoverable(&route.path))
        .map(|route| format!("{base_url}{}", route.path))
        .collect()
}

/// A path is discoverable when it has no `{param}` segment, no embedded
/// whitespace, and no empty segment.
fn is_discoverable(path: &str) -> bool {
    if path.is_empty() || !path.starts_with('/') || path.contains(char::is_whitespace) {
        return false;
    }
    path.split('/').skip(1).all(|segment| {
        !segment.is_empty() && !segment.starts_with('{')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn route(path: &str) -> RouteDescriptor {
        RouteDescriptor { path: path.to_owned(), methods: vec![Method::GET] }
    }

    #[test]
    fn parameterized_paths_are_excluded() {
        let routes = vec![
            route("/api/v1/courses"),
            route("/api/v1/courses/{id}"),
            route("/api"),
        ];
        let listed = discover(&routes, "");
        assert_eq!(listed, vec!["/api/v1/courses", "/api"]);
    }

    #[test]
    fn malformed_paths_are_excluded() {
        let routes = vec![
            route("/api/ widget"),
            route("/api//double"),
            route(""),
            route("/api/ok"),
        ];
        assert_eq!(discover(&routes, ""), vec!["/api/ok"]);
    }

    #[test]
    fn base_url_prefixes_every_path() {
        let routes = vec![route("/api"), route("/api/v1/courses")];
        let listed = discover(&routes, "http://localhost:3000");
        assert_eq!(
            listed,
            vec!["http://localhost:3000/api", "http://localhost:3000/api/v1/courses"]
        );
    }
}
