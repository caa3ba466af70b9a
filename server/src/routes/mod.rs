//! Route definitions for the relay.
//!
//! ## Routes
//!
//! - `GET /` - Plain-text placeholder
//! - `GET /codepen` - Showcase records as a JSON array
//!
//! Every route answers CORS preflights and carries
//! `access-control-allow-origin: *`.

mod codepen;
mod home;

use axum::http::{HeaderMap, Method, Uri};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};

use crate::state::AppState;

/// Build the complete relay router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home))
        .route("/codepen", get(codepen::codepen_feed))
        .with_state(state)
        .layer(cors())
}

/// Allow any origin; echo the requested method and headers on preflight.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Client address as reported by a fronting proxy, if any.
fn client_addr(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(|c: char| c == ',' || c.is_whitespace())
        .find(|part| !part.is_empty())
}

fn log_incoming(method: &Method, uri: &Uri, headers: &HeaderMap) {
    tracing::info!(
        method = %method,
        uri = %uri,
        client = client_addr(headers).unwrap_or("unknown"),
        "incoming connection"
    );
}
