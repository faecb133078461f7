//! Full gateway wiring — config, persistence, public and protected routes.
//!
//! Run with:
//!   RUST_LOG=info JWT_SECRET=dev-secret \
//!   DATABASE_URI_DEV=mongodb://localhost:27017/dev \
//!   cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/api
//!   curl http://localhost:3000/api/v1/courses          # 401 without a token
//!   curl -X OPTIONS -i http://localhost:3000/api/v1/courses

use http::Method;
use turnstile::{Error, Gateway, GatewayConfig, Request, Response, Server, StatusCode};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = GatewayConfig::from_env()?;

    // Serving traffic the persistence layer cannot back is worse than not
    // starting: a connect failure aborts the process here.
    connect(&config.database_uri).await?;
    tracing::info!("using the {} database", config.mode.as_str());

    let gateway = Gateway::builder()
        .route(Method::POST, "/api/login", login)
        .route(Method::POST, "/api/register", register)
        .protected(Method::GET, "/api/v1/courses", list_courses)
        .protected(Method::POST, "/api/v1/courses", create_course)
        .protected(Method::GET, "/api/v1/courses/{id}", get_course)
        .protected(Method::GET, "/api/v1/departments", list_departments)
        .protected(Method::GET, "/api/v1/institutions", list_institutions)
        .build(&config);

    Server::bind(&format!("0.0.0.0:{}", config.listen_port))
        .serve(gateway)
        .await
}

/// Stand-in for the persistence connector. A real deployment would open a
/// connection pool against `uri` and return `Error::Upstream` on failure.
async fn connect(uri: &str) -> Result<(), Error> {
    if uri.is_empty() {
        return Err(Error::Upstream("empty database URI".to_owned()));
    }
    Ok(())
}

// The handlers below are placeholders for the domain's own logic. The
// gateway's only requirement is that protected handlers receive a request
// already carrying a verified identity claim.

async fn login(_req: Request) -> Response {
    // A real issuer mints the token here; the gateway never does.
    Response::json(br#"{"token":"<issued-elsewhere>"}"#.to_vec())
}

async fn register(_req: Request) -> Response {
    Response::status(StatusCode::CREATED)
}

async fn list_courses(req: Request) -> Response {
    let who = &req.identity().expect("protected route").subject_id;
    Response::json(format!(r#"{{"courses":[],"requested_by":"{who}"}}"#).into_bytes())
}

async fn create_course(_req: Request) -> Response {
    Response::builder()
        .status(StatusCode::CREATED)
        .json(br#"{"id":"99"}"#.to_vec())
}

async fn get_course(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes())
}

async fn list_departments(_req: Request) -> Response {
    Response::json(br#"{"departments":[]}"#.to_vec())
}

async fn list_institutions(_req: Request) -> Response {
    Response::json(br#"{"institutions":[]}"#.to_vec())
}
