use std::sync::Arc;
use std::time::{Duration, Instant};

use shared::store::{MenuStore, StoreError};

use crate::auth::{AccountStore, JwtService, RateLimiter};
use crate::core::Config;
use crate::store;

/// Server state, shared by every handler
///
/// | Field | Type | Meaning |
/// |-------|------|---------|
/// | config | Arc<Config> | immutable configuration |
/// | store | Arc<dyn MenuStore> | menu persistence |
/// | accounts | Arc<AccountStore> | email/password accounts |
/// | jwt_service | Arc<JwtService> | session tokens |
/// | rate_limiter | RateLimiter | per-IP request budget |
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub store: Arc<dyn MenuStore>,
    pub accounts: Arc<AccountStore>,
    pub jwt_service: Arc<JwtService>,
    pub rate_limiter: RateLimiter,
    pub started_at: Instant,
}

impl ServerState {
    /// Open the configured store and seed it when `SEED_FILE` is set
    pub async fn initialize(config: &Config) -> Result<Self, StoreError> {
        tracing::info!(db_uri = %config.masked_db_uri(), "Opening menu store");
        let store = store::open_store(&config.db_uri).await?;

        if let Some(seed) = &config.seed_file {
            // a broken seed file should not keep the service down
            if let Err(e) = store::seed_from_file(store.as_ref(), seed).await {
                tracing::warn!(error = %e, "Seeding failed");
            }
        }

        Ok(Self::with_store(config, store))
    }

    /// Build state around an existing store
    pub fn with_store(config: &Config, store: Arc<dyn MenuStore>) -> Self {
        Self {
            config: Arc::new(config.clone()),
            store,
            accounts: Arc::new(AccountStore::new().with_password_sign_in(config.password_sign_in)),
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            rate_limiter: RateLimiter::new(
                config.rate_limit_max,
                Duration::from_secs(config.rate_limit_window_secs),
            ),
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Periodic housekeeping: rate limiter entries and expired revocations
    pub fn start_background_tasks(&self) {
        let rate_limiter = self.rate_limiter.clone();
        let jwt_service = self.jwt_service.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(300));
            loop {
                interval.tick().await;
                rate_limiter.cleanup().await;
                let purged = jwt_service.purge_expired_revocations();
                if purged > 0 {
                    tracing::debug!(purged, "Purged expired token revocations");
                }
            }
        });
    }
}
