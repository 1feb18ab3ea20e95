//! Credential store - account registration and password verification.
//!
//! Password hashing lives in the domain [`Password`] value object; this
//! service owns the registration rules and the login lookup.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::config::MIN_USERNAME_LENGTH;
use crate::domain::{normalize_email, Account, NewAccount, Password, Role};
use crate::errors::{AppError, AppResult};
use crate::infra::AccountRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Verified against when the email is unknown, so both login failures cost one hash.
static DUMMY_VERIFIER: Lazy<Option<Password>> =
    Lazy::new(|| Password::new("timing-equalizer-password").ok());

/// Registration input, not yet validated
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

/// Credential store trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Create an account after validating and hashing the password
    async fn register(&self, registration: Registration) -> AppResult<Account>;

    /// Check an email/password pair; unknown email and wrong password fail alike
    async fn verify(&self, email: &str, password: &str) -> AppResult<Account>;

    /// Provenance lookup for `Item::created_by`
    async fn find_account(&self, id: Uuid) -> AppResult<Option<Account>>;
}

/// Concrete implementation of [`CredentialStore`] over an account repository.
pub struct AccountRegistry<R: AccountRepository> {
    accounts: Arc<R>,
}

impl<R: AccountRepository> AccountRegistry<R> {
    pub fn new(accounts: Arc<R>) -> Self {
        Self { accounts }
    }
}

fn validate_username(username: &str) -> AppResult<String> {
    let trimmed = username.trim();
    if trimmed.chars().count() < MIN_USERNAME_LENGTH {
        return Err(AppError::validation(format!(
            "Username must be at least {} characters",
            MIN_USERNAME_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_email(email: &str) -> AppResult<String> {
    let normalized = normalize_email(email);
    if !normalized.validate_email() {
        return Err(AppError::validation("Please provide a valid email"));
    }
    Ok(normalized)
}

#[async_trait]
impl<R: AccountRepository> CredentialStore for AccountRegistry<R> {
    async fn register(&self, registration: Registration) -> AppResult<Account> {
        let username = validate_username(&registration.username)?;
        let email = validate_email(&registration.email)?;
        let password = Password::new(&registration.password)?;

        if self.accounts.find_by_email(&email).await?.is_some()
            || self.accounts.find_by_username(&username).await?.is_some()
        {
            tracing::debug!("Registration rejected: account already exists");
            return Err(AppError::DuplicateAccount);
        }

        let account = self
            .accounts
            .create(NewAccount {
                username,
                email,
                password_hash: password.into_string(),
                role: registration.role.unwrap_or_default(),
            })
            .await?;

        tracing::info!(account_id = %account.id, role = %account.role, "Account registered");
        Ok(account)
    }

    async fn verify(&self, email: &str, password: &str) -> AppResult<Account> {
        let email = normalize_email(email);

        let Some(account) = self.accounts.find_by_email(&email).await? else {
            if let Some(dummy) = DUMMY_VERIFIER.as_ref() {
                let _ = dummy.verify(password);
            }
            tracing::debug!("Login failed: unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if !Password::from_hash(account.password_hash.clone()).verify(password) {
            tracing::debug!(account_id = %account.id, "Login failed: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        Ok(account)
    }

    async fn find_account(&self, id: Uuid) -> AppResult<Option<Account>> {
        self.accounts.find_by_id(id).await
    }
}
