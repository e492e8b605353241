//! Authentication middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// Require a valid `Authorization: Bearer <token>` header
///
/// On success [`CurrentUser`] is inserted into the request extensions, and
/// into the response extensions for the access log. CORS preflight requests
/// pass through.
///
/// | Failure | Code |
/// |---------|------|
/// | no header | NotAuthenticated (401) |
/// | expired token | TokenExpired (401) |
/// | any other invalid or revoked token | TokenInvalid (401) |
/// | account disabled or gone | AccountDisabled (403) |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            if state.accounts.find_active_by_id(&claims.sub).is_none() {
                security_log!("WARN", "auth_inactive_account", user_id = claims.sub.clone());
                return Err(AppError::new(ErrorCode::AccountDisabled));
            }
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user.clone());
            let mut response = next.run(req).await;
            // picked up by the access log
            response.extensions_mut().insert(user);
            Ok(response)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}
