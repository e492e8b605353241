//! Account registry
//!
//! Email/password accounts with argon2 hashes. Emails are stored normalised
//! (trimmed, lowercase) and are unique.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use shared::models::User;
use shared::session::{AuthError, normalize_email, validate_email, validate_password};

#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn user(&self) -> User {
        User {
            id: self.id.clone(),
            email: self.email.clone(),
        }
    }

    fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

/// In-process account registry keyed by normalised email
#[derive(Debug)]
pub struct AccountStore {
    accounts: DashMap<String, Account>,
    /// When false, every sign-in and sign-up fails with `OperationNotAllowed`
    password_sign_in_enabled: bool,
}

impl AccountStore {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            password_sign_in_enabled: true,
        }
    }

    pub fn with_password_sign_in(mut self, enabled: bool) -> Self {
        self.password_sign_in_enabled = enabled;
        self
    }

    /// Register a new account
    pub fn sign_up(&self, email: &str, password: &str) -> Result<User, AuthError> {
        self.ensure_enabled()?;
        let email = normalize_email(email);
        validate_email(&email)?;
        validate_password(password)?;

        if self.accounts.contains_key(&email) {
            return Err(AuthError::EmailAlreadyInUse);
        }
        let password_hash =
            hash_password(password).map_err(|e| AuthError::Unavailable(e.to_string()))?;

        // re-check under the entry lock, hashing happens outside it
        match self.accounts.entry(email.clone()) {
            Entry::Occupied(_) => Err(AuthError::EmailAlreadyInUse),
            Entry::Vacant(slot) => {
                let account = Account {
                    id: uuid::Uuid::new_v4().to_string(),
                    email,
                    password_hash,
                    disabled: false,
                    created_at: Utc::now(),
                };
                let user = account.user();
                slot.insert(account);
                Ok(user)
            }
        }
    }

    /// Check credentials
    pub fn verify(&self, email: &str, password: &str) -> Result<User, AuthError> {
        self.ensure_enabled()?;
        let email = normalize_email(email);
        validate_email(&email)?;

        let account = self
            .accounts
            .get(&email)
            .map(|a| a.value().clone())
            .ok_or(AuthError::UserNotFound)?;

        if account.disabled {
            return Err(AuthError::UserDisabled);
        }

        let valid = account
            .verify_password(password)
            .map_err(|e| AuthError::Unavailable(format!("Password verification failed: {e}")))?;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(account.user())
    }

    /// Enable or disable an account. Returns `false` for unknown emails.
    pub fn set_disabled(&self, email: &str, disabled: bool) -> bool {
        match self.accounts.get_mut(&normalize_email(email)) {
            Some(mut account) => {
                account.disabled = disabled;
                true
            }
            None => false,
        }
    }

    /// Active account by user id
    pub fn find_active_by_id(&self, id: &str) -> Option<User> {
        self.accounts
            .iter()
            .find(|a| a.id == id && !a.disabled)
            .map(|a| a.user())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn ensure_enabled(&self) -> Result<(), AuthError> {
        if self.password_sign_in_enabled {
            Ok(())
        } else {
            Err(AuthError::OperationNotAllowed)
        }
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}
