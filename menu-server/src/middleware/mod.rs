//! HTTP middleware

pub mod logging;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{Any, CorsLayer};

pub use logging::logging_middleware;

/// CORS for the configured frontend origin, `*` allows any origin
pub fn cors_layer(frontend_url: &str) -> CorsLayer {
    if frontend_url == "*" {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    match frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        Err(e) => {
            tracing::warn!(frontend_url = %frontend_url, error = %e, "Invalid FRONTEND_URL, cross-origin requests disabled");
            CorsLayer::new()
        }
    }
}
