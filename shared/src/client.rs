//! Request/response types shared between menu-server and menu-client

use serde::{Deserialize, Serialize};

use crate::models::User;
use crate::sort::SortType;

// Re-export the response envelope for client code
pub use crate::error::ApiResponse;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login / signup request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Login / signup response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
    /// Seconds until the token expires
    pub expires_in: i64,
}

// =============================================================================
// Food API DTOs
// =============================================================================

/// Review submission body. Id and timestamp are assigned server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCreate {
    pub rating: u8,
    pub comment: String,
}

/// `GET /api/foods` query string
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodListQuery {
    #[serde(default)]
    pub sort: Option<SortType>,
}

// =============================================================================
// Health
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// healthy | degraded
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub store: CheckResult,
}

/// Single component check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// ok | error
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckResult {
    pub fn ok_with_latency(latency_ms: u64) -> Self {
        Self {
            status: "ok".into(),
            latency_ms: Some(latency_ms),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".into(),
            latency_ms: None,
            message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
