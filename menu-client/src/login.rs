//! Login / sign-up form

use shared::models::User;
use shared::session::{AuthError, SessionProvider};

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    sign_up: bool,
    busy: bool,
    error: Option<String>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_sign_up(&self) -> bool {
        self.sign_up
    }

    pub fn toggle_mode(&mut self) {
        self.sign_up = !self.sign_up;
        self.error = None;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Inline message from the last failed attempt
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn subtitle(&self) -> &'static str {
        if self.sign_up {
            "Create your culinary journey"
        } else {
            "Welcome back, food lover"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match (self.busy, self.sign_up) {
            (true, _) => "Processing...",
            (false, true) => "Sign Up",
            (false, false) => "Login",
        }
    }

    pub fn toggle_label(&self) -> &'static str {
        if self.sign_up {
            "Already have an account? Login"
        } else {
            "Don't have an account? Sign Up"
        }
    }

    /// Sign in or sign up. Input is kept on failure so the user can retry.
    pub async fn submit(&mut self, session: &dyn SessionProvider) -> Result<User, AuthError> {
        self.busy = true;
        self.error = None;

        let result = if self.sign_up {
            session.sign_up(&self.email, &self.password).await
        } else {
            session.sign_in(&self.email, &self.password).await
        };
        self.busy = false;

        match result {
            Ok(user) => {
                self.password.clear();
                Ok(user)
            }
            Err(e) => {
                tracing::debug!(error = %e, sign_up = self.sign_up, "Authentication failed");
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::session::AuthHandler;
    use shared::subscription::{Subscribers, SubscriptionToken};

    struct FailingSession(AuthError);

    #[async_trait]
    impl SessionProvider for FailingSession {
        async fn current_user(&self) -> Result<Option<User>, AuthError> {
            Ok(None)
        }

        async fn sign_in(&self, _email: &str, _password: &str) -> Result<User, AuthError> {
            Err(self.0.clone())
        }

        async fn sign_up(&self, _email: &str, _password: &str) -> Result<User, AuthError> {
            Err(self.0.clone())
        }

        async fn sign_out(&self) -> Result<(), AuthError> {
            Ok(())
        }

        fn on_auth_state_change(&self, handler: AuthHandler) -> SubscriptionToken {
            Subscribers::new().subscribe(handler)
        }

        fn unsubscribe(&self, _token: SubscriptionToken) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_known_failure_shows_mapped_message() {
        let session = FailingSession(AuthError::InvalidCredentials);
        let mut form = LoginForm::new();
        form.email = "diner@example.com".into();
        form.password = "wrong".into();

        assert!(form.submit(&session).await.is_err());
        assert_eq!(form.error(), Some("Incorrect password."));
        assert_eq!(form.email, "diner@example.com");
        assert_eq!(form.password, "wrong");
        assert!(!form.is_busy());
        assert_eq!(form.submit_label(), "Login");
    }

    #[tokio::test]
    async fn test_unknown_failure_strips_vendor_prefix() {
        let session = FailingSession(AuthError::Provider {
            code: "auth/network-request-failed".into(),
            message: "Vendor: Network request failed (auth/network-request-failed).".into(),
        });
        let mut form = LoginForm::new();
        form.toggle_mode();
        assert!(form.submit(&session).await.is_err());
        assert_eq!(form.error(), Some("Network request failed"));
    }

    #[test]
    fn test_toggle_mode_labels() {
        let mut form = LoginForm::new();
        assert_eq!(form.subtitle(), "Welcome back, food lover");
        form.set_error("stale");
        form.toggle_mode();
        assert!(form.is_sign_up());
        assert_eq!(form.submit_label(), "Sign Up");
        assert_eq!(form.toggle_label(), "Already have an account? Login");
        assert!(form.error().is_none());
    }
}
