//! Food Routes
//!
//! | Path | Method | Meaning |
//! |------|--------|---------|
//! | /api/foods | GET | list, newest first, `?sort=rating\|price_asc\|price_desc` |
//! | /api/foods | POST | add food |
//! | /api/foods/{id} | GET | one food |
//! | /api/foods/{id}/reviews | POST | append a review |
//!
//! All routes require authentication.

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/foods", get(handler::list).post(handler::create))
        .route("/api/foods/{id}", get(handler::get_by_id))
        .route("/api/foods/{id}/reviews", post(handler::add_review))
}
