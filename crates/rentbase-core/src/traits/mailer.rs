//! Outbound mail delivery trait.

use async_trait::async_trait;

use crate::result::AppResult;

/// Delivers password-reset links to account holders.
///
/// The transport (SMTP, provider API) is an external collaborator; this
/// core only hands it the recipient and the one-time token. Implementations
/// must not log the token.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a password-reset link carrying the given one-time token.
    async fn send_password_reset(&self, recipient: &str, token: &str) -> AppResult<()>;
}

/// A mailer that silently drops every message. Used in tests and in
/// deployments where reset mail is disabled.
#[derive(Debug, Clone, Default)]
pub struct NullMailer;

#[async_trait]
impl Mailer for NullMailer {
    async fn send_password_reset(&self, _recipient: &str, _token: &str) -> AppResult<()> {
        Ok(())
    }
}
