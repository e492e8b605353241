//! `SessionProvider` over the menu-server auth endpoints

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::client::{AuthResponse, Credentials};
use shared::error::ErrorCode;
use shared::models::User;
use shared::session::{AuthError, AuthHandler, AuthState, SessionProvider};
use shared::subscription::{Subscribers, SubscriptionToken};

use crate::ClientError;
use crate::http::HttpClient;

/// Session backed by a JWT held in the shared [`HttpClient`]
pub struct HttpSessionProvider {
    http: Arc<HttpClient>,
    current: RwLock<Option<User>>,
    listeners: Subscribers<AuthState>,
}

impl HttpSessionProvider {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self {
            http,
            current: RwLock::new(None),
            listeners: Subscribers::new(),
        }
    }

    async fn authenticate(&self, action: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let body = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp: AuthResponse = self.http.post(&["api", "auth", action], &body).await?;

        self.http.set_token(Some(resp.token));
        *self.current.write() = Some(resp.user.clone());
        self.listeners.notify(&AuthState::SignedIn(resp.user.clone()));
        Ok(resp.user)
    }

    fn clear(&self) {
        self.http.set_token(None);
        *self.current.write() = None;
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    /// Cached user, or the token's owner when a token was set externally
    async fn current_user(&self) -> Result<Option<User>, AuthError> {
        if let Some(user) = self.current.read().clone() {
            return Ok(Some(user));
        }
        if self.http.token().is_none() {
            return Ok(None);
        }

        match self.http.get::<User>(&["api", "auth", "me"]).await {
            Ok(user) => {
                *self.current.write() = Some(user.clone());
                Ok(Some(user))
            }
            Err(ClientError::Api(e))
                if matches!(
                    e.code,
                    ErrorCode::NotAuthenticated | ErrorCode::TokenExpired | ErrorCode::TokenInvalid
                ) =>
            {
                tracing::debug!(code = %e.code, "Stored token rejected, treating as signed out");
                self.clear();
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        self.authenticate("login", email, password).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<User, AuthError> {
        self.authenticate("signup", email, password).await
    }

    /// Always signs out locally; a failed server-side revoke is only logged
    async fn sign_out(&self) -> Result<(), AuthError> {
        if self.http.token().is_some()
            && let Err(e) = self.http.post_empty::<()>(&["api", "auth", "logout"]).await
        {
            tracing::warn!(error = %e, "Token revocation failed");
        }

        let was_signed_in = self.current.read().is_some();
        self.clear();
        if was_signed_in {
            self.listeners.notify(&AuthState::SignedOut);
        }
        Ok(())
    }

    fn on_auth_state_change(&self, handler: AuthHandler) -> SubscriptionToken {
        self.listeners.subscribe(handler)
    }

    fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        self.listeners.unsubscribe(token)
    }
}
