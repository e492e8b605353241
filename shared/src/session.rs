//! Session provider capability
//!
//! Identity is owned by an external provider. The menu core only needs to
//! know who is signed in and to be told when that changes.

use async_trait::async_trait;
use thiserror::Error;
use validator::ValidateEmail;

use crate::error::{AppError, ErrorCode};
use crate::models::User;
use crate::subscription::SubscriptionToken;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Authentication failures, by cause
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user not found")]
    UserNotFound,

    #[error("user disabled")]
    UserDisabled,

    #[error("email already in use")]
    EmailAlreadyInUse,

    #[error("weak password")]
    WeakPassword,

    #[error("invalid email")]
    InvalidEmail,

    #[error("operation not allowed")]
    OperationNotAllowed,

    #[error("auth provider unavailable: {0}")]
    Unavailable(String),

    /// Cause the provider reported that has no dedicated variant
    #[error("{message}")]
    Provider { code: String, message: String },
}

impl AuthError {
    /// Message shown inline on the login form
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidEmail => "Invalid email address.".into(),
            Self::UserDisabled => "This user account has been disabled.".into(),
            Self::UserNotFound => "No user found with this email.".into(),
            Self::InvalidCredentials => "Incorrect password.".into(),
            Self::EmailAlreadyInUse => "Email is already registered.".into(),
            Self::OperationNotAllowed => "Email/Password sign-in is not enabled.".into(),
            Self::WeakPassword => {
                format!("Password should be at least {MIN_PASSWORD_LEN} characters.")
            }
            Self::Unavailable(message) => strip_vendor_prefix(message),
            Self::Provider { message, .. } => strip_vendor_prefix(message),
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidCredentials => ErrorCode::InvalidCredentials,
            Self::UserNotFound => ErrorCode::UserNotFound,
            Self::UserDisabled => ErrorCode::AccountDisabled,
            Self::EmailAlreadyInUse => ErrorCode::EmailAlreadyInUse,
            Self::WeakPassword => ErrorCode::WeakPassword,
            Self::InvalidEmail => ErrorCode::InvalidEmail,
            Self::OperationNotAllowed => ErrorCode::OperationNotAllowed,
            Self::Unavailable(_) => ErrorCode::StoreUnavailable,
            Self::Provider { .. } => ErrorCode::Unknown,
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let code = err.error_code();
        match &err {
            AuthError::Provider { code: cause, .. } => {
                AppError::with_message(code, err.to_string()).with_detail("cause", cause.clone())
            }
            AuthError::Unavailable(message) => AppError::with_message(code, message.clone()),
            _ => AppError::new(code),
        }
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.code {
            ErrorCode::InvalidCredentials => Self::InvalidCredentials,
            ErrorCode::UserNotFound => Self::UserNotFound,
            ErrorCode::AccountDisabled => Self::UserDisabled,
            ErrorCode::EmailAlreadyInUse => Self::EmailAlreadyInUse,
            ErrorCode::WeakPassword => Self::WeakPassword,
            ErrorCode::InvalidEmail => Self::InvalidEmail,
            ErrorCode::OperationNotAllowed => Self::OperationNotAllowed,
            ErrorCode::StoreUnavailable
            | ErrorCode::TimeoutError
            | ErrorCode::InternalError => Self::Unavailable(err.message),
            _ => {
                let cause = err
                    .details
                    .as_ref()
                    .and_then(|d| d.get("cause"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| err.code.to_string());
                Self::Provider {
                    code: cause,
                    message: err.message,
                }
            }
        }
    }
}

/// Drop a leading `"<Vendor>: "` and the trailing `"(auth/...)"` cause marker
///
/// `"Vendor: Something broke (auth/internal-error)."` becomes
/// `"Something broke"`.
pub fn strip_vendor_prefix(message: &str) -> String {
    let mut text = message;
    if let Some((vendor, rest)) = text.split_once(": ")
        && !vendor.is_empty()
        && vendor.chars().all(|c| c.is_ascii_alphanumeric())
    {
        text = rest;
    }

    let stripped = match text.find("(auth/") {
        Some(start) => match text.rfind(')') {
            Some(end) if end > start => {
                let tail = &text[end + 1..];
                let tail = tail.strip_prefix('.').unwrap_or(tail);
                format!("{}{}", &text[..start], tail)
            }
            _ => text.to_string(),
        },
        None => text.to_string(),
    };
    stripped.trim().to_string()
}

/// Reject malformed addresses before they reach a provider
pub fn validate_email(email: &str) -> Result<(), AuthError> {
    if email.to_string().validate_email() {
        Ok(())
    } else {
        Err(AuthError::InvalidEmail)
    }
}

/// Minimum length, counted in characters
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}

/// Emails compare case-insensitively and without surrounding whitespace
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Auth state pushed to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    SignedIn(User),
    SignedOut,
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::SignedIn(user) => Some(user),
            Self::SignedOut => None,
        }
    }
}

impl From<Option<User>> for AuthState {
    fn from(user: Option<User>) -> Self {
        match user {
            Some(user) => Self::SignedIn(user),
            None => Self::SignedOut,
        }
    }
}

pub type AuthHandler = Box<dyn Fn(&AuthState) + Send + Sync>;

/// Session provider contract
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Currently signed-in user, if any
    async fn current_user(&self) -> Result<Option<User>, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError>;

    /// Create an account and sign it in
    async fn sign_up(&self, email: &str, password: &str) -> Result<User, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Subscribe to sign-in and sign-out transitions
    fn on_auth_state_change(&self, handler: AuthHandler) -> SubscriptionToken;

    /// No further callbacks for `token` once this returns
    fn unsubscribe(&self, token: SubscriptionToken) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_causes_have_fixed_messages() {
        assert_eq!(AuthError::InvalidEmail.user_message(), "Invalid email address.");
        assert_eq!(
            AuthError::UserDisabled.user_message(),
            "This user account has been disabled."
        );
        assert_eq!(
            AuthError::UserNotFound.user_message(),
            "No user found with this email."
        );
        assert_eq!(AuthError::InvalidCredentials.user_message(), "Incorrect password.");
        assert_eq!(
            AuthError::EmailAlreadyInUse.user_message(),
            "Email is already registered."
        );
        assert_eq!(
            AuthError::WeakPassword.user_message(),
            "Password should be at least 6 characters."
        );
    }

    #[test]
    fn test_unknown_cause_strips_vendor_prefix() {
        let err = AuthError::Provider {
            code: "auth/network-request-failed".into(),
            message: "Vendor: A network error has occurred (auth/network-request-failed)."
                .into(),
        };
        assert_eq!(err.user_message(), "A network error has occurred");
    }

    #[test]
    fn test_strip_vendor_prefix_leaves_plain_messages() {
        assert_eq!(strip_vendor_prefix("Something went wrong"), "Something went wrong");
        assert_eq!(
            strip_vendor_prefix("Rate limited: slow down please"),
            "Rate limited: slow down please"
        );
        assert_eq!(strip_vendor_prefix("Vendor: Oops"), "Oops");
        assert_eq!(strip_vendor_prefix("Bad thing (auth/x)"), "Bad thing");
    }

    #[test]
    fn test_password_policy() {
        assert_eq!(validate_password("12345"), Err(AuthError::WeakPassword));
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn test_email_policy() {
        assert!(validate_email("diner@example.com").is_ok());
        assert_eq!(validate_email("not-an-email"), Err(AuthError::InvalidEmail));
        assert_eq!(normalize_email("  Diner@Example.COM "), "diner@example.com");
    }

    #[test]
    fn test_auth_error_roundtrips_through_app_error() {
        for err in [
            AuthError::InvalidCredentials,
            AuthError::UserNotFound,
            AuthError::UserDisabled,
            AuthError::EmailAlreadyInUse,
            AuthError::WeakPassword,
            AuthError::InvalidEmail,
            AuthError::OperationNotAllowed,
        ] {
            let app: AppError = err.clone().into();
            assert_eq!(AuthError::from(app), err);
        }

        let provider = AuthError::Provider {
            code: "auth/quota".into(),
            message: "Vendor: quota hit (auth/quota).".into(),
        };
        let back = AuthError::from(AppError::from(provider.clone()));
        assert_eq!(back, provider);
    }

    #[test]
    fn test_auth_state_user() {
        let user = User {
            id: "u1".into(),
            email: "a@b.co".into(),
        };
        assert_eq!(AuthState::from(Some(user.clone())).user(), Some(&user));
        assert_eq!(AuthState::from(None).user(), None);
    }
}
