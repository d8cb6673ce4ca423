//! Periodic clearing of expired lockouts and reset tokens.

use std::sync::Arc;

use tracing::info;

use rentbase_core::error::AppError;
use rentbase_database::repositories::AccountRepository;

/// Clears lockouts and reset tokens whose windows have elapsed.
///
/// Each sweep is a pair of idempotent `WHERE expired` updates, so running
/// it concurrently with normal traffic (or with another sweep) is safe and
/// a no-op when nothing has expired. Scheduling is the embedding process's
/// concern.
#[derive(Clone)]
pub struct ExpirySweeper {
    accounts: Arc<AccountRepository>,
}

impl std::fmt::Debug for ExpirySweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpirySweeper").finish()
    }
}

impl ExpirySweeper {
    /// Creates a new sweeper.
    pub fn new(accounts: Arc<AccountRepository>) -> Self {
        Self { accounts }
    }

    /// Runs one sweep cycle. Returns the number of rows touched.
    pub async fn run(&self) -> Result<u64, AppError> {
        let lockouts = self.accounts.clear_expired_lockouts().await?;
        let reset_tokens = self.accounts.clear_expired_reset_tokens().await?;

        let total = lockouts + reset_tokens;
        if total > 0 {
            info!(lockouts, reset_tokens, "Expiry sweep cleared stale auth state");
        }

        Ok(total)
    }
}
