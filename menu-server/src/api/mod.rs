//! API routes
//!
//! - [`health`] - liveness and health
//! - [`auth`] - sign up, login, logout, current user
//! - [`foods`] - menu and reviews

pub mod auth;
pub mod foods;
pub mod health;

use std::time::Duration;

use axum::{Router, middleware};
use http::StatusCode;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::rate_limit::rate_limit;
use crate::auth::require_auth;
use crate::core::ServerState;
use crate::middleware::{cors_layer, logging_middleware};

/// Full application router with middleware
pub fn router(state: ServerState) -> Router {
    let protected = Router::new()
        .merge(auth::protected_router())
        .merge(foods::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(health::router())
        .merge(auth::public_router())
        .merge(protected)
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_millis(state.config.request_timeout_ms),
        ))
        .layer(cors_layer(&state.config.frontend_url))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
