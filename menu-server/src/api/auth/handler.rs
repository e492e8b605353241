//! Authentication Handlers
//!
//! Sign up, login, logout and current user

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use shared::client::{AuthResponse, Credentials};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::User;
use shared::session::AuthError;

use crate::auth::{AccountStore, CurrentUser};
use crate::core::ServerState;
use crate::security_log;

/// Argon2 work runs off the async workers
async fn with_accounts<F>(state: &ServerState, f: F) -> Result<User, AuthError>
where
    F: FnOnce(&AccountStore) -> Result<User, AuthError> + Send + 'static,
{
    let accounts = state.accounts.clone();
    tokio::task::spawn_blocking(move || f(&accounts))
        .await
        .map_err(|e| AuthError::Unavailable(e.to_string()))?
}

fn issue_token(state: &ServerState, user: User) -> AppResult<Json<AuthResponse>> {
    let token = state
        .jwt_service
        .generate_token(&user)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    Ok(Json(AuthResponse {
        token,
        user,
        expires_in: state.jwt_service.config.expiration_minutes * 60,
    }))
}

/// Create an account and sign it in
pub async fn signup(
    State(state): State<ServerState>,
    req: Result<Json<Credentials>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(Credentials { email, password }) = req?;
    let user = match with_accounts(&state, move |a| a.sign_up(&email, &password)).await {
        Ok(user) => user,
        Err(e) => {
            security_log!("WARN", "signup_failed", reason = e.to_string());
            return Err(e.into());
        }
    };

    tracing::info!(user_id = %user.id, "User signed up");
    issue_token(&state, user)
}

/// Check credentials and return a JWT
pub async fn login(
    State(state): State<ServerState>,
    req: Result<Json<Credentials>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(Credentials { email, password }) = req?;
    let user = match with_accounts(&state, move |a| a.verify(&email, &password)).await {
        Ok(user) => user,
        Err(e) => {
            security_log!("WARN", "login_failed", reason = e.to_string());
            return Err(e.into());
        }
    };

    tracing::info!(user_id = %user.id, "User logged in");
    issue_token(&state, user)
}

/// Current user
pub async fn me(State(state): State<ServerState>, user: CurrentUser) -> AppResult<Json<User>> {
    state
        .accounts
        .find_active_by_id(&user.id)
        .map(Json)
        .ok_or_else(|| AppError::new(ErrorCode::AccountDisabled))
}

/// Revoke the presented token
pub async fn logout(State(state): State<ServerState>, user: CurrentUser) -> Json<()> {
    state.jwt_service.revoke(&user.jti, user.exp);
    security_log!("INFO", "logout", user_id = user.id.clone());
    Json(())
}
