//! Health check routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | / | GET | no |
//! | /health | GET | no |

use axum::{Json, Router, extract::State, routing::get};
use shared::client::{CheckResult, HealthResponse};

use crate::core::ServerState;

pub const ROOT_MESSAGE: &str = "Restaurant Backend is running";

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

/// Plain-text liveness probe
pub async fn root() -> &'static str {
    ROOT_MESSAGE
}

/// Health including a store round trip
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let start = std::time::Instant::now();
    let store = match state.store.list_food_items().await {
        Ok(_) => CheckResult::ok_with_latency(start.elapsed().as_millis() as u64),
        Err(e) => CheckResult::error(e.to_string()),
    };

    Json(HealthResponse {
        status: if store.is_ok() { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        store,
    })
}
