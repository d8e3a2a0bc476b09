//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                    - Product listing
//! GET  /health                              - Liveness check
//! GET  /health/ready                        - Readiness check (catalog loaded)
//!
//! # Products
//! GET  /products/{handle}                   - Product page (mounts a configurator)
//!
//! # Configurator (HTMX fragments)
//! POST /configurator/{mount}/width          - Select width (image + summary)
//! POST /configurator/{mount}/drop           - Select drop (summary)
//! POST /configurator/{mount}/add-to-cart    - Add to cart (toast + HX-Trigger)
//!
//! GET  /static/*                            - CSS and bundled images
//! ```

pub mod configurator;
pub mod home;
pub mod products;

use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{
    csp_nonce_middleware, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// Create the configurator routes router.
pub fn configurator_routes() -> Router<AppState> {
    Router::new()
        .route("/{mount}/width", post(configurator::select_width))
        .route("/{mount}/drop", post(configurator::select_drop))
        .route("/{mount}/add-to-cart", post(configurator::add_to_cart))
}

/// Create all page and fragment routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/products/{handle}", get(products::show))
        .nest("/configurator", configurator_routes())
}

/// Build the complete application: routes, health checks, static files and
/// the middleware stack. Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config().static_dir.clone();

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
        // Innermost first: the nonce must be set before security headers read it
        .layer(from_fn(csp_nonce_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable until at least one product is loaded.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.catalog().is_empty() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}
