//! Mercato is a small e-commerce backend: an item catalog, guest and
//! user carts, and token-based accounts.

#[forbid(unsafe_code)]
#[deny(missing_docs, unused_mut)]
mod cart;
mod crypto;
mod database;
pub mod error;
mod item;
mod middleware;
mod router;
pub mod seed;
pub mod telemetry;
mod token;
mod user;

pub mod config;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::routing::get;
use error::ServerError;
use tower::ServiceBuilder;
use tower_http::LatencyUnit;
use tower_http::cors::CorsLayer;
use tower_http::sensitive_headers::SetSensitiveHeadersLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};

/// MUST NEVER be used in production.
#[cfg(test)]
pub async fn make_request(
    app: Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    session: Option<&str>,
    body: String,
) -> axum::http::Response<axum::body::Body> {
    use axum::extract::Request;
    use tower::util::ServiceExt;

    let mut request = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(session) = session {
        request = request.header("Session-Id", session);
    }

    app.oneshot(request.body(axum::body::Body::from(body)).unwrap())
        .await
        .unwrap()
}

/// State sharing between routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Configuration>,
    pub db: database::Database,
    pub crypto: crypto::PasswordManager,
    pub token: token::TokenManager,
}

/// Create router.
pub fn app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        // Add high level tracing/logging to all requests.
        .layer(
            TraceLayer::new_for_http()
                .on_body_chunk(|chunk: &Bytes, latency: Duration, _span: &tracing::Span| {
                    tracing::trace!(size_bytes = chunk.len(), latency = ?latency, "sending body chunk")
                })
                .make_span_with(DefaultMakeSpan::new().include_headers(true).level(tracing::Level::INFO))
                .on_request(DefaultOnRequest::new())
                .on_response(DefaultOnResponse::new().include_headers(true).latency_unit(LatencyUnit::Micros)),
        )
        // Set a timeout.
        .layer(TimeoutLayer::new(Duration::from_secs(10)))
        // Remove sensitive headers from trace.
        .layer(SetSensitiveHeadersLayer::new([header::AUTHORIZATION]))
        // Add CORS preflight support.
        .layer(cors(&state));

    Router::new()
        // `GET /health` goes to `health`.
        .route("/health", get(router::health::handler))
        .nest("/api/auth", router::auth::router(state.clone()))
        .nest("/api/items", router::items::router(state.clone()))
        .nest("/api/cart", router::cart::router(state.clone()))
        .with_state(state)
        .layer(middleware)
}

/// Browsers are let in from the configured frontend only, with
/// credentials allowed.
fn cors(state: &AppState) -> CorsLayer {
    let origin = state
        .config
        .frontend_url
        .trim_end_matches('/')
        .parse::<HeaderValue>()
        .unwrap_or_else(|_| HeaderValue::from_static(config::DEFAULT_FRONTEND_URL));

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("session-id"),
        ])
        .allow_credentials(true)
        .vary([header::AUTHORIZATION])
}

/// Initialize the application state.
pub async fn initialize_state() -> Result<AppState, Box<dyn std::error::Error>> {
    // read configuration file. let it in memory.
    let config = config::Configuration::default().read()?;

    let db = database::Database::new(&config.postgres).await?;

    // execute migrations scripts on start.
    sqlx::migrate!().run(&db.postgres).await?;

    let token = token::TokenManager::new(&config.secret_key);

    Ok(AppState {
        config,
        db,
        crypto: crypto::PasswordManager,
        token,
    })
}
