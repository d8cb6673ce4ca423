//! Session lifecycle orchestrator — login, refresh, logout, password
//! change, and permission queries.
//!
//! Per-account session state is implicit in the account row: no-session →
//! authenticated on login, renewed on refresh, back to no-session on logout
//! or revoke. Lockout is an orthogonal timestamp that blocks the login
//! transition regardless of password correctness.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use rentbase_core::error::AppError;
use rentbase_database::repositories::AccountRepository;
use rentbase_entity::account::{Account, AccountRole, AccountStatus, AccountSummary, CreateAccount};
use rentbase_entity::permission::{PermissionSet, Resource};

use crate::credential::CredentialVerifier;
use crate::jwt::encoder::TokenPair;
use crate::jwt::TokenService;
use crate::password::{PasswordHasher, PasswordPolicy};
use crate::permission::PermissionResolver;

/// Result of a successful login.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LoginResult {
    /// Generated token pair.
    pub tokens: TokenPair,
    /// Credential-free view of the authenticated account.
    pub account: AccountSummary,
}

/// Composes the auth components into the caller-facing use cases.
#[derive(Clone)]
pub struct SessionLifecycle {
    accounts: Arc<AccountRepository>,
    credentials: CredentialVerifier,
    tokens: TokenService,
    permissions: PermissionResolver,
    hasher: PasswordHasher,
    policy: PasswordPolicy,
}

impl std::fmt::Debug for SessionLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLifecycle").finish()
    }
}

impl SessionLifecycle {
    /// Creates a new lifecycle orchestrator.
    pub fn new(
        accounts: Arc<AccountRepository>,
        credentials: CredentialVerifier,
        tokens: TokenService,
        permissions: PermissionResolver,
        policy: PasswordPolicy,
    ) -> Self {
        Self {
            accounts,
            credentials,
            tokens,
            permissions,
            hasher: PasswordHasher::new(),
            policy,
        }
    }

    /// Performs the complete login flow:
    ///
    /// 1. Look up the account; unknown emails burn a dummy verification
    ///    and fail with the same generic Unauthorized as a wrong password.
    /// 2. Lockout pre-check, before any hash work. The only login failure
    ///    allowed a non-generic message (the retry hint).
    /// 3. Status gate: only `active` accounts may proceed.
    /// 4. Verify the password; a mismatch records a failure (and possibly
    ///    a lockout).
    /// 5. Reset failure state, issue and persist the token pair, stamp
    ///    last login.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AppError> {
        let Some(account) = self.accounts.find_by_email(email).await? else {
            self.credentials.verify_nonexistent(password);
            return Err(AppError::invalid_credentials());
        };

        self.credentials.check_lockout(&account)?;

        if !account.status.can_login() {
            self.credentials.verify_nonexistent(password);
            return Err(AppError::invalid_credentials());
        }

        if !self.credentials.verify(&account, password)? {
            self.credentials.record_failure(account.id).await?;
            return Err(AppError::invalid_credentials());
        }

        self.credentials.record_success(account.id).await?;

        let tokens = self.tokens.issue_pair(&account).await?;
        self.accounts.update_last_login(account.id).await?;

        info!(account_id = %account.id, role = %account.role, "Login successful");

        Ok(LoginResult {
            tokens,
            account: account.summary(),
        })
    }

    /// Rotates a refresh token into a new pair. A superseded token fails
    /// Unauthorized; the other device's session dies with it.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let (pair, _account) = self.tokens.rotate(refresh_token).await?;
        Ok(pair)
    }

    /// Logs out by revoking the stored refresh token.
    pub async fn logout(&self, account_id: Uuid) -> Result<(), AppError> {
        self.tokens.revoke(account_id).await?;
        info!(account_id = %account_id, "Logout completed");
        Ok(())
    }

    /// Provisions a new account: `pending` for self-registration, `active`
    /// for admin creation. A duplicate email surfaces as Conflict. When an
    /// initial password is supplied it must pass policy; otherwise the hash
    /// stays null until the first reset completes.
    pub async fn provision(
        &self,
        mut data: CreateAccount,
        initial_password: Option<&str>,
    ) -> Result<AccountSummary, AppError> {
        if data.role.requires_city() && data.city_id.is_none() {
            return Err(AppError::bad_request("Role requires a city id"));
        }
        if data.role.requires_unit() && data.unit_id.is_none() {
            return Err(AppError::bad_request("Role requires a unit id"));
        }

        data.password_hash = match initial_password {
            Some(password) => {
                self.policy.validate(password)?;
                Some(self.hasher.hash_password(password)?)
            }
            None => None,
        };

        let account = self.accounts.create(&data).await?;
        info!(account_id = %account.id, role = %account.role, "Account provisioned");
        Ok(account.summary())
    }

    /// Soft-deactivates an account and force-revokes its session. Accounts
    /// are never hard-deleted.
    pub async fn deactivate(&self, account_id: Uuid) -> Result<(), AppError> {
        self.accounts
            .update_status(account_id, AccountStatus::Inactive)
            .await?;
        self.tokens.revoke(account_id).await?;
        info!(account_id = %account_id, "Account deactivated");
        Ok(())
    }

    /// Changes the password of an authenticated account.
    ///
    /// The current password must verify; the new one must pass policy and
    /// differ from the current.
    pub async fn change_password(
        &self,
        account_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::not_found("Account not found"))?;

        if !self.credentials.verify(&account, current_password)? {
            return Err(AppError::unauthorized("Current password is incorrect"));
        }

        self.policy.validate_not_same(current_password, new_password)?;
        self.policy.validate(new_password)?;

        let new_hash = self.hasher.hash_password(new_password)?;
        self.accounts.update_password(account_id, &new_hash).await?;

        info!(account_id = %account_id, "Password changed");
        Ok(())
    }

    /// Returns the caller's own effective permission table.
    pub async fn my_permissions(
        &self,
        account_id: Uuid,
    ) -> Result<BTreeMap<Resource, PermissionSet>, AppError> {
        let account = self.require_account(account_id).await?;
        self.permissions.resolve(account.id, account.role).await
    }

    /// Returns another account's effective permission table.
    ///
    /// Forbidden unless the requester is top-tier or asking about themself.
    pub async fn computed_permissions(
        &self,
        target_account_id: Uuid,
        requester_id: Uuid,
        requester_role: AccountRole,
    ) -> Result<BTreeMap<Resource, PermissionSet>, AppError> {
        if requester_id != target_account_id && !requester_role.is_top_tier() {
            return Err(AppError::forbidden(
                "Insufficient role to inspect another account's permissions",
            ));
        }

        let target = self.require_account(target_account_id).await?;
        self.permissions.resolve(target.id, target.role).await
    }

    async fn require_account(&self, account_id: Uuid) -> Result<Account, AppError> {
        self.accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::not_found("Account not found"))
    }
}
