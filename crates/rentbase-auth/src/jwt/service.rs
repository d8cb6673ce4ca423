//! Token issuance, verification, rotation, and revocation over the
//! account store.
//!
//! The single-active-token design: each account stores at most one valid
//! refresh token. Issuing a new one supersedes the previous immediately;
//! presenting a superseded token, however well-signed, is Unauthorized.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use rentbase_core::config::auth::AuthConfig;
use rentbase_core::error::AppError;
use rentbase_database::repositories::AccountRepository;
use rentbase_entity::account::{Account, AccountStatus};

use super::claims::Claims;
use super::decoder::JwtDecoder;
use super::encoder::{JwtEncoder, TokenPair};

/// Issues, verifies, rotates, and revokes session tokens.
#[derive(Clone)]
pub struct TokenService {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    accounts: Arc<AccountRepository>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").finish()
    }
}

impl TokenService {
    /// Creates a new token service.
    pub fn new(config: &AuthConfig, accounts: Arc<AccountRepository>) -> Self {
        Self {
            encoder: JwtEncoder::new(config),
            decoder: JwtDecoder::new(config),
            accounts,
        }
    }

    /// Issues a fresh token pair for the account and persists the refresh
    /// token as the single active value, superseding any previous session.
    pub async fn issue_pair(&self, account: &Account) -> Result<TokenPair, AppError> {
        let pair = self.encoder.generate_token_pair(account)?;

        self.accounts
            .store_refresh_token(account.id, &pair.refresh_token, pair.refresh_expires_at)
            .await?;

        Ok(pair)
    }

    /// Verifies an access token: signature and expiry only. Stateless.
    pub fn verify_access(&self, token: &str) -> Result<Claims, AppError> {
        self.decoder.decode_access_token(token)
    }

    /// Rotates a refresh token into a new pair.
    ///
    /// After the signature/expiry check, the presented token must be
    /// byte-equal to the value currently stored on the account with an
    /// unexpired stored expiry; the swap to the new value is a single
    /// compare-and-set. A stale-but-well-signed token failing the CAS is
    /// the reuse-detection mechanism.
    pub async fn rotate(&self, refresh_token: &str) -> Result<(TokenPair, Account), AppError> {
        let claims = self.decoder.decode_refresh_token(refresh_token)?;
        let account_id = claims.account_id();

        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid token"))?;

        if account.status != AccountStatus::Active {
            return Err(AppError::unauthorized("Invalid token"));
        }

        let pair = self.encoder.generate_token_pair(&account)?;

        let swapped = self
            .accounts
            .rotate_refresh_token(
                account_id,
                refresh_token,
                &pair.refresh_token,
                pair.refresh_expires_at,
            )
            .await?;

        if !swapped {
            warn!(account_id = %account_id, "Refresh token reuse or stale rotation detected");
            return Err(AppError::unauthorized("Invalid token"));
        }

        info!(account_id = %account_id, "Refresh token rotated");
        Ok((pair, account))
    }

    /// Revokes the account's active refresh token (logout).
    pub async fn revoke(&self, account_id: Uuid) -> Result<(), AppError> {
        self.accounts.clear_refresh_token(account_id).await?;
        info!(account_id = %account_id, "Refresh token revoked");
        Ok(())
    }
}
