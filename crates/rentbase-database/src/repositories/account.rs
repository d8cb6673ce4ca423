//! Account repository implementation.
//!
//! The rotation, reset-consumption, and failed-attempt statements are the
//! compare-and-set points the auth flows rely on: each carries its expected
//! prior state in the `WHERE` clause, so two racing callers cannot both
//! succeed against the same prior value.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use rentbase_core::error::{AppError, ErrorKind};
use rentbase_core::result::AppResult;
use rentbase_entity::account::{Account, AccountStatus, CreateAccount};

/// Repository for account CRUD and auth-state mutations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new account repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an account by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by id", e)
            })
    }

    /// Find an account by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by email", e)
            })
    }

    /// Create a new account.
    pub async fn create(&self, data: &CreateAccount) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (email, password_hash, display_name, role, city_id, unit_id, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.display_name)
        .bind(data.role)
        .bind(data.city_id)
        .bind(data.unit_id)
        .bind(data.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("accounts_email_key") =>
            {
                AppError::conflict("Email already in use".to_string())
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create account", e),
        })
    }

    /// Soft-deactivate an account. Accounts are never hard-deleted.
    pub async fn update_status(&self, account_id: Uuid, status: AccountStatus) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE accounts SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(account_id)
                .bind(status)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to update status", e)
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Account {account_id} not found")));
        }
        Ok(())
    }

    /// Update an account's password hash.
    pub async fn update_password(&self, account_id: Uuid, password_hash: &str) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE accounts SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(account_id)
                .bind(password_hash)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to update password", e)
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Account {account_id} not found")));
        }
        Ok(())
    }

    /// Atomically increment the failed-attempt counter, returning the new
    /// count. Concurrent failed logins serialize on the row; no increment is
    /// lost to a read-modify-write race.
    pub async fn increment_failed_attempts(&self, account_id: Uuid) -> AppResult<i32> {
        let row: (i32,) = sqlx::query_as(
            "UPDATE accounts SET failed_attempts = failed_attempts + 1, updated_at = NOW() \
             WHERE id = $1 RETURNING failed_attempts",
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to increment failed attempts", e)
        })?;

        Ok(row.0)
    }

    /// Set the lockout expiry. The counter is left as-is; the next
    /// successful login clears both.
    pub async fn lock_until(&self, account_id: Uuid, until: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE accounts SET locked_until = $2, updated_at = NOW() WHERE id = $1")
            .bind(account_id)
            .bind(until)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock account", e))?;
        Ok(())
    }

    /// Reset the failed-attempt counter and clear any lockout.
    pub async fn reset_failed_attempts(&self, account_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE accounts SET failed_attempts = 0, locked_until = NULL, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(account_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to reset failed attempts", e)
        })?;
        Ok(())
    }

    /// Store a new refresh token, unconditionally superseding any previous
    /// one. This is the single-active-token issuance path (login).
    pub async fn store_refresh_token(
        &self,
        account_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE accounts SET refresh_token = $2, refresh_token_expires_at = $3, \
                                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(account_id)
        .bind(token)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to store refresh token", e)
        })?;
        Ok(())
    }

    /// Compare-and-swap the stored refresh token: succeeds only if the
    /// stored value is byte-equal to `expected` and its expiry has not
    /// passed. Returns `false` when the swap did not happen — a superseded
    /// or unknown token, which the caller must treat as Unauthorized.
    pub async fn rotate_refresh_token(
        &self,
        account_id: Uuid,
        expected: &str,
        new_token: &str,
        new_expires_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE accounts SET refresh_token = $3, refresh_token_expires_at = $4, \
                                 updated_at = NOW() \
             WHERE id = $1 AND refresh_token = $2 AND refresh_token_expires_at > NOW()",
        )
        .bind(account_id)
        .bind(expected)
        .bind(new_token)
        .bind(new_expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to rotate refresh token", e)
        })?;

        Ok(result.rows_affected() == 1)
    }

    /// Clear the stored refresh token and its expiry (logout / revoke).
    pub async fn clear_refresh_token(&self, account_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE accounts SET refresh_token = NULL, refresh_token_expires_at = NULL, \
                                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(account_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to clear refresh token", e)
        })?;
        Ok(())
    }

    /// Store a one-time password-reset token with its expiry.
    pub async fn set_reset_token(
        &self,
        account_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE accounts SET reset_token = $2, reset_token_expires_at = $3, \
                                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(account_id)
        .bind(token)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set reset token", e))?;
        Ok(())
    }

    /// Consume a reset token in one atomic update: only an account whose
    /// stored token equals the presented value with an unexpired expiry
    /// matches. The statement writes the new hash, clears the token and
    /// lockout state, and activates a pending account. Two racing consumers
    /// cannot both match.
    pub async fn consume_reset_token(
        &self,
        token: &str,
        new_password_hash: &str,
    ) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>(
            "UPDATE accounts SET password_hash = $2, \
                                 reset_token = NULL, reset_token_expires_at = NULL, \
                                 failed_attempts = 0, locked_until = NULL, \
                                 status = CASE WHEN status = 'pending' THEN 'active'::account_status ELSE status END, \
                                 updated_at = NOW() \
             WHERE reset_token = $1 AND reset_token_expires_at > NOW() \
             RETURNING *",
        )
        .bind(token)
        .bind(new_password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to consume reset token", e)
        })
    }

    /// Update last login timestamp.
    pub async fn update_last_login(&self, account_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE accounts SET last_login_at = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update last login", e)
            })?;
        Ok(())
    }

    /// Clear lockouts whose window has elapsed. Returns the number of rows
    /// touched; a no-op when nothing is expired.
    pub async fn clear_expired_lockouts(&self) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE accounts SET locked_until = NULL, failed_attempts = 0, updated_at = NOW() \
             WHERE locked_until IS NOT NULL AND locked_until <= NOW()",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to clear expired lockouts", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Clear reset tokens whose expiry has passed.
    pub async fn clear_expired_reset_tokens(&self) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE accounts SET reset_token = NULL, reset_token_expires_at = NULL, \
                                 updated_at = NOW() \
             WHERE reset_token IS NOT NULL AND reset_token_expires_at <= NOW()",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to clear expired reset tokens", e)
        })?;
        Ok(result.rows_affected())
    }
}
