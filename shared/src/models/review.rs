//! Review Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user's star rating and comment attached to a food item
///
/// Reviews are append-only: once created they are never edited or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub id: String,
    /// 1..=5 stars
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl ReviewEntry {
    /// Create a review with a fresh id and the current timestamp
    ///
    /// No validation happens here, see [`crate::rating::validate_review`].
    pub fn new(rating: u8, comment: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            rating,
            comment: comment.into(),
            created_at: Utc::now(),
        }
    }
}
