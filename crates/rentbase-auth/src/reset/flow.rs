//! Password reset: issue a one-time token, consume it exactly once.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tracing::{error, info};

use rentbase_core::config::auth::AuthConfig;
use rentbase_core::error::AppError;
use rentbase_core::traits::Mailer;
use rentbase_database::repositories::AccountRepository;

use crate::password::{PasswordHasher, PasswordPolicy};

/// Bytes of entropy in a reset token (hex-encoded to 64 characters).
const RESET_TOKEN_BYTES: usize = 32;

/// Issues and consumes one-time password-reset tokens.
#[derive(Clone)]
pub struct PasswordResetFlow {
    accounts: Arc<AccountRepository>,
    mailer: Arc<dyn Mailer>,
    hasher: PasswordHasher,
    policy: PasswordPolicy,
    /// Reset token lifetime in hours.
    token_ttl_hours: i64,
    /// Upper bound on mail hand-off time.
    mailer_timeout: Duration,
}

impl std::fmt::Debug for PasswordResetFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordResetFlow")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .finish()
    }
}

impl PasswordResetFlow {
    /// Creates a new reset flow.
    pub fn new(
        config: &AuthConfig,
        accounts: Arc<AccountRepository>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            accounts,
            mailer,
            hasher: PasswordHasher::new(),
            policy: PasswordPolicy::new(config),
            token_ttl_hours: config.reset_token_ttl_hours,
            mailer_timeout: Duration::from_secs(config.mailer_timeout_seconds),
        }
    }

    /// Requests a reset link for the given email.
    ///
    /// Idempotent and existence-blind: both paths return Ok. The outcome
    /// must not reveal whether the email matched an account, so delivery
    /// failures are logged and swallowed rather than surfaced (they only
    /// occur on the match path), and the unmatched path burns an Argon2
    /// verification to keep its latency in the same band as the store
    /// write and mail hand-off.
    pub async fn request(&self, email: &str) -> Result<(), AppError> {
        let token = generate_reset_token();

        match self.accounts.find_by_email(email).await? {
            Some(account) => {
                let expires_at = Utc::now() + chrono::Duration::hours(self.token_ttl_hours);
                self.accounts
                    .set_reset_token(account.id, &token, expires_at)
                    .await?;

                self.deliver(&account.email, &token).await;
                info!(account_id = %account.id, "Password reset token issued");
            }
            None => {
                self.hasher.dummy_verify(&token);
                info!("Password reset requested");
            }
        }

        Ok(())
    }

    /// Hands the token to the mailer, bounded by the configured timeout.
    /// The stored token stays valid either way, so a later retry of the
    /// same request can still complete the flow.
    async fn deliver(&self, recipient: &str, token: &str) {
        let delivery = tokio::time::timeout(
            self.mailer_timeout,
            self.mailer.send_password_reset(recipient, token),
        )
        .await;

        match delivery {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, "Reset mail delivery failed"),
            Err(_) => error!("Reset mail delivery timed out"),
        }
    }

    /// Consumes a reset token, setting the new password.
    ///
    /// The lookup, hash write, token clear, lockout reset, and pending
    /// activation happen in one atomic store update; racing consumers of
    /// the same token cannot both succeed. Unknown and expired tokens get
    /// the same BadRequest.
    pub async fn consume(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        self.policy.validate(new_password)?;
        let new_hash = self.hasher.hash_password(new_password)?;

        let account = self
            .accounts
            .consume_reset_token(token, &new_hash)
            .await?
            .ok_or_else(|| AppError::bad_request("Invalid or expired reset token"))?;

        info!(account_id = %account.id, "Password reset completed");
        Ok(())
    }
}

/// Generates a high-entropy one-time token, hex-encoded.
fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_token_shape_and_uniqueness() {
        let a = generate_reset_token();
        let b = generate_reset_token();
        assert_eq!(a.len(), RESET_TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
