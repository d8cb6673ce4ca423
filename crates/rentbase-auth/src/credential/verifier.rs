//! Password verification and failed-attempt/lockout bookkeeping.
//!
//! Lockout state is persisted on the account row, never cached in process
//! memory: the core runs across many stateless workers and a local counter
//! would under-count attacks spread over instances.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use rentbase_core::config::auth::AuthConfig;
use rentbase_core::error::AppError;
use rentbase_database::repositories::AccountRepository;
use rentbase_entity::account::Account;

use crate::password::PasswordHasher;

/// Verifies credentials and tracks failed attempts against the store.
#[derive(Clone)]
pub struct CredentialVerifier {
    accounts: Arc<AccountRepository>,
    hasher: PasswordHasher,
    /// Failed attempts before a lockout is set.
    max_failed_attempts: i32,
    /// Length of the lockout window in minutes.
    lockout_duration_minutes: i64,
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVerifier")
            .field("max_failed_attempts", &self.max_failed_attempts)
            .field("lockout_duration_minutes", &self.lockout_duration_minutes)
            .finish()
    }
}

impl CredentialVerifier {
    /// Creates a new verifier.
    pub fn new(config: &AuthConfig, accounts: Arc<AccountRepository>) -> Self {
        Self {
            accounts,
            hasher: PasswordHasher::new(),
            max_failed_attempts: config.max_failed_attempts,
            lockout_duration_minutes: config.lockout_duration_minutes,
        }
    }

    /// Fails fast with the lockout retry hint when the account is locked.
    ///
    /// Runs before any hash work. The remaining wait is safe to disclose;
    /// whether the email exists is not, and is never part of the message.
    pub fn check_lockout(&self, account: &Account) -> Result<(), AppError> {
        let now = Utc::now();
        if account.is_locked(now) {
            let minutes = account.lockout_minutes_remaining(now);
            return Err(AppError::unauthorized(format!(
                "Account is locked. Retry in {minutes} minute(s)"
            )));
        }
        Ok(())
    }

    /// Verifies a plaintext password against the account's stored hash.
    ///
    /// An account without a hash (first setup not completed) never
    /// verifies; the work-shaped dummy check keeps the path's timing in
    /// line with a real mismatch.
    pub fn verify(&self, account: &Account, password: &str) -> Result<bool, AppError> {
        match &account.password_hash {
            Some(hash) => self.hasher.verify_password(password, hash),
            None => {
                self.hasher.dummy_verify(password);
                Ok(false)
            }
        }
    }

    /// Burns one verification's worth of work for the unknown-email path.
    pub fn verify_nonexistent(&self, password: &str) {
        self.hasher.dummy_verify(password);
    }

    /// Records a failed attempt: atomic counter increment, and at the
    /// threshold a lockout expiring `lockout_duration_minutes` from now.
    /// The counter stays put; the next successful login resets both.
    pub async fn record_failure(&self, account_id: Uuid) -> Result<(), AppError> {
        let attempts = self.accounts.increment_failed_attempts(account_id).await?;

        if attempts >= self.max_failed_attempts {
            let until = Utc::now() + chrono::Duration::minutes(self.lockout_duration_minutes);
            self.accounts.lock_until(account_id, until).await?;
            warn!(
                account_id = %account_id,
                attempts,
                locked_until = %until,
                "Account locked after repeated failed logins"
            );
        }

        Ok(())
    }

    /// Records a successful verification: counter to zero, lockout cleared.
    pub async fn record_success(&self, account_id: Uuid) -> Result<(), AppError> {
        self.accounts.reset_failed_attempts(account_id).await
    }
}
