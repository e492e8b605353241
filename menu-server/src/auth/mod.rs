//! Authentication
//!
//! - [`AccountStore`] - email/password accounts (argon2)
//! - [`JwtService`] - session tokens and revocation
//! - [`require_auth`] - middleware guarding `/api` routes
//! - [`LocalSessionProvider`] - in-process session provider
//! - [`RateLimiter`] - per-IP request limiting

pub mod accounts;
mod extractor;
pub mod jwt;
pub mod middleware;
pub mod rate_limit;
pub mod session;

pub use accounts::{Account, AccountStore};
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
pub use rate_limit::RateLimiter;
pub use session::LocalSessionProvider;
