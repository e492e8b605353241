//! User Model

use serde::{Deserialize, Serialize};

/// Signed-in user as seen by the menu core
///
/// Owned by the session provider; the core only reads it to gate access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
}
