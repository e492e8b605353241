//! Data models
//!
//! Shared between menu-server and menu-client (via API).
//! All IDs are opaque strings assigned by the store or generated at creation.

pub mod food;
pub mod review;
pub mod user;

// Re-exports
pub use food::*;
pub use review::*;
pub use user::*;
