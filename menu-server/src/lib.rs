//! Menu Server - restaurant menu and review backend
//!
//! ```text
//! menu-server/src/
//! ├── core/          # config, state, server, errors
//! ├── auth/          # accounts, JWT, rate limiting, session provider
//! ├── store/         # MenuStore backends (memory, SurrealDB) and seeding
//! ├── api/           # HTTP routes and handlers
//! ├── middleware/    # access log, CORS
//! └── utils/         # logger
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod middleware;
pub mod store;
pub mod utils;

pub use auth::{CurrentUser, JwtService, LocalSessionProvider};
pub use core::{Config, ConfigError, Server, ServerError, ServerState};
pub use store::{MemoryMenuStore, SurrealMenuStore, open_store, seed_from_file};
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load `.env` and configuration, then initialize logging
pub fn setup_environment() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    init_logger_with_file(
        Some(&config.log_level),
        config.log_json,
        config.log_dir.as_deref(),
    );
    Ok(config)
}
