//! JWT token service
//!
//! Issues and validates session tokens. Sign-out revokes a token by its `jti`
//! until the token would have expired anyway.

use chrono::{Duration, Utc};
use dashmap::DashMap;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::models::User;
use thiserror::Error;

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Signing secret (at least 32 bytes)
    pub secret: String,
    /// Token lifetime (minutes)
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            expiration_minutes: 1440,
            issuer: "menu-server".to_string(),
            audience: "menu-clients".to_string(),
        }
    }
}

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub email: String,
    /// Token ID, used for revocation
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token revoked")]
    Revoked,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// JWT token service
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// jti -> exp of signed-out tokens
    revoked: DashMap<String, i64>,
}

impl JwtService {
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
            revoked: DashMap::new(),
        }
    }

    /// Issue a new token for `user`
    pub fn generate_token(&self, user: &User) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            jti: uuid::Uuid::new_v4().to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        if self.revoked.contains_key(&token_data.claims.jti) {
            return Err(JwtError::Revoked);
        }

        Ok(token_data.claims)
    }

    /// Revoke a token until its natural expiry
    pub fn revoke(&self, jti: &str, exp: i64) {
        self.revoked.insert(jti.to_string(), exp);
    }

    /// Drop revocations whose tokens have expired
    pub fn purge_expired_revocations(&self) -> usize {
        let now = Utc::now().timestamp();
        let before = self.revoked.len();
        self.revoked.retain(|_, exp| *exp > now);
        before - self.revoked.len()
    }

    /// Extract the token from an `Authorization` header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("revoked", &self.revoked.len())
            .finish()
    }
}

/// Current user context, parsed from JWT claims
///
/// Inserted into request extensions by [`super::require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub jti: String,
    pub exp: i64,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            jti: claims.jti,
            exp: claims.exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "test-secret-key-with-at-least-32-characters".to_string(),
            ..JwtConfig::default()
        })
    }

    fn user() -> User {
        User {
            id: "u1".to_string(),
            email: "diner@example.com".to_string(),
        }
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = service();
        let token = service.generate_token(&user()).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.email, "diner@example.com");
        assert_eq!(claims.iss, "menu-server");
        assert_eq!(claims.exp - claims.iat, 1440 * 60);
    }

    #[test]
    fn test_tokens_have_distinct_ids() {
        let service = service();
        let a = service.validate_token(&service.generate_token(&user()).unwrap()).unwrap();
        let b = service.validate_token(&service.generate_token(&user()).unwrap()).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_revoked_token_is_rejected() {
        let service = service();
        let token = service.generate_token(&user()).unwrap();
        let claims = service.validate_token(&token).unwrap();

        service.revoke(&claims.jti, claims.exp);
        assert!(matches!(service.validate_token(&token), Err(JwtError::Revoked)));
        // still valid revocation, nothing to purge
        assert_eq!(service.purge_expired_revocations(), 0);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = service().generate_token(&user()).unwrap();
        let other = JwtService::with_config(JwtConfig {
            secret: "another-secret-key-with-at-least-32-chars".to_string(),
            ..JwtConfig::default()
        });
        assert!(matches!(
            other.validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_expired_token() {
        let service = JwtService::with_config(JwtConfig {
            secret: "test-secret-key-with-at-least-32-characters".to_string(),
            expiration_minutes: -5,
            ..JwtConfig::default()
        });
        let token = service.generate_token(&user()).unwrap();
        assert!(matches!(service.validate_token(&token), Err(JwtError::ExpiredToken)));
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }
}
