//! In-process session provider
//!
//! Single-session [`SessionProvider`] over an [`AccountStore`], for embedding
//! the menu core without going through HTTP.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::models::User;
use shared::session::{AuthError, AuthHandler, AuthState, SessionProvider};
use shared::subscription::{Subscribers, SubscriptionToken};

use super::AccountStore;

pub struct LocalSessionProvider {
    accounts: Arc<AccountStore>,
    current: RwLock<Option<User>>,
    listeners: Subscribers<AuthState>,
}

impl LocalSessionProvider {
    pub fn new(accounts: Arc<AccountStore>) -> Self {
        Self {
            accounts,
            current: RwLock::new(None),
            listeners: Subscribers::new(),
        }
    }

    pub fn accounts(&self) -> &Arc<AccountStore> {
        &self.accounts
    }

    fn set_current(&self, user: Option<User>) {
        *self.current.write() = user.clone();
        self.listeners.notify(&AuthState::from(user));
    }

    async fn run_blocking<F>(&self, f: F) -> Result<User, AuthError>
    where
        F: FnOnce(&AccountStore) -> Result<User, AuthError> + Send + 'static,
    {
        let accounts = self.accounts.clone();
        tokio::task::spawn_blocking(move || f(&accounts))
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?
    }
}

#[async_trait]
impl SessionProvider for LocalSessionProvider {
    async fn current_user(&self) -> Result<Option<User>, AuthError> {
        let user = self.current.read().clone();
        // an account disabled mid-session no longer counts as signed in
        Ok(user.filter(|u| self.accounts.find_active_by_id(&u.id).is_some()))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let (email, password) = (email.to_string(), password.to_string());
        let user = self
            .run_blocking(move |accounts| accounts.verify(&email, &password))
            .await?;
        tracing::info!(user_id = %user.id, "Signed in");
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let (email, password) = (email.to_string(), password.to_string());
        let user = self
            .run_blocking(move |accounts| accounts.sign_up(&email, &password))
            .await?;
        tracing::info!(user_id = %user.id, "Signed up");
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.set_current(None);
        Ok(())
    }

    fn on_auth_state_change(&self, handler: AuthHandler) -> SubscriptionToken {
        self.listeners.subscribe(handler)
    }

    fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        self.listeners.unsubscribe(token)
    }
}
