//! # relgraph HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /status` - Session status and graph metrics
//! - `GET /graph` - Full, unfiltered render document
//! - `GET /graph/view` - Render document under the published filters
//! - `POST /graph/view` - Render document under ad-hoc filters (not published)
//! - `GET /facets` - Facet options over the full node set
//! - `GET /filters` - Published filter state
//! - `PUT /filters` - Replace the filter state
//! - `POST /filters/op` - Apply one filter operation
//! - `POST /filters/reset` - Restore default filters
//! - `GET /members/{email}/relations` - Relations of one member, by type
//! - `PUT /snapshot` - Publish a new members/relations snapshot
//!
//! ## Security Configuration
//!
//! - `cors_origins` / `RELGRAPH_CORS_ORIGINS`: allowed origins, or "*" for all
//!   (default: localhost only)
//! - `rate_limit` / `RELGRAPH_RATE_LIMIT`: requests per second (0 to disable)

mod handlers;
mod middleware;
mod types;

pub use handlers::{
    detail_handler, facets_handler, filter_op_handler, get_filters_handler, graph_handler,
    health_handler, preview_handler, put_filters_handler, reset_filters_handler,
    snapshot_handler, status_handler, view_handler,
};
pub use middleware::{GlobalRateLimiter, create_rate_limiter};
pub use types::{
    DetailResponse, FiltersResponse, HealthResponse, SnapshotResponse, StatusResponse,
    ViewResponse,
};

use crate::config::ServerConfig;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use relgraph_core::primitives::MAX_SNAPSHOT_BYTES;
use relgraph_core::{GraphSession, RelgraphError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the graph session.
///
/// The session is the single owner of the filter state; every update runs
/// under the write lock.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<GraphSession>>,
}

impl AppState {
    #[must_use]
    pub fn new(session: GraphSession) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

const CORS_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::PUT, Method::OPTIONS];

/// Build the CORS layer from the configured origins.
///
/// - `["*"]`: allows all origins (development only)
/// - empty: localhost only
/// - otherwise: the listed origins; invalid entries are skipped
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
        return CorsLayer::permissive();
    }

    if origins.is_empty() {
        tracing::info!("CORS: No origins configured, defaulting to localhost only");
        return build_localhost_cors();
    }

    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(hv) => {
                tracing::info!("CORS: Allowing origin: {}", origin);
                Some(hv)
            }
            Err(e) => {
                tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    if allowed_origins.is_empty() {
        tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
        return build_localhost_cors();
    }

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(CORS_METHODS)
        .allow_headers([header::CONTENT_TYPE])
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:5173",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5173",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(CORS_METHODS)
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit - caps snapshot uploads
/// 4. Rate Limiting - if enabled
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/graph", get(handlers::graph_handler))
        .route(
            "/graph/view",
            get(handlers::view_handler).post(handlers::preview_handler),
        )
        .route("/facets", get(handlers::facets_handler))
        .route(
            "/filters",
            get(handlers::get_filters_handler).put(handlers::put_filters_handler),
        )
        .route("/filters/op", post(handlers::filter_op_handler))
        .route("/filters/reset", post(handlers::reset_filters_handler))
        .route("/members/{email}/relations", get(handlers::detail_handler))
        .route("/snapshot", axum::routing::put(handlers::snapshot_handler));

    if server.rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", server.rate_limit);
        router = router.layer(axum_middleware::from_fn_with_state(
            create_rate_limiter(server.rate_limit),
            middleware::rate_limit_middleware,
        ));
    } else {
        tracing::info!("Rate limiting disabled");
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(MAX_SNAPSHOT_BYTES))
        .layer(build_cors_layer(&server.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server on `server.host:server.port`.
pub async fn run_server(state: AppState, server: &ServerConfig) -> Result<(), RelgraphError> {
    let addr = server.addr();
    let router = create_router(state, server);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RelgraphError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("relgraph HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| RelgraphError::IoError(format!("Server error: {}", e)))
}

/// Resolves on Ctrl+C. If the handler cannot be installed the server runs
/// until killed.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::warn!("Cannot listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
