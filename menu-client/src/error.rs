//! Client error types

use shared::error::AppError;
use shared::session::AuthError;
use shared::store::StoreError;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connect, TLS, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error envelope returned by menu-server
    #[error("{0}")]
    Api(AppError),

    /// Base URL that cannot carry a path
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl From<ClientError> for StoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api(e) => e.into(),
            ClientError::Http(e) if e.is_timeout() => StoreError::Timeout,
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

impl From<ClientError> for AuthError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api(e) => e.into(),
            other => AuthError::Unavailable(other.to_string()),
        }
    }
}
