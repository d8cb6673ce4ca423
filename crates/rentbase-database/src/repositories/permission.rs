//! Permission matrix and override repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use rentbase_core::error::{AppError, ErrorKind};
use rentbase_core::result::AppResult;
use rentbase_entity::account::AccountRole;
use rentbase_entity::permission::{PermissionOverride, RolePermission};

/// Repository for role permission defaults and per-account overrides.
#[derive(Debug, Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    /// Create a new permission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch all matrix entries for a role.
    pub async fn find_role_defaults(&self, role: AccountRole) -> AppResult<Vec<RolePermission>> {
        sqlx::query_as::<_, RolePermission>(
            "SELECT * FROM role_permissions WHERE role = $1 ORDER BY resource",
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load role defaults", e)
        })
    }

    /// Fetch all overrides for an account.
    pub async fn find_overrides(&self, account_id: Uuid) -> AppResult<Vec<PermissionOverride>> {
        sqlx::query_as::<_, PermissionOverride>(
            "SELECT * FROM permission_overrides WHERE account_id = $1 ORDER BY resource",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load overrides", e))
    }

    /// Bulk upsert of role matrix entries.
    pub async fn upsert_role_defaults(&self, entries: &[RolePermission]) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        for entry in entries {
            sqlx::query(
                "INSERT INTO role_permissions \
                     (role, resource, can_view, can_create, can_edit, can_delete, can_export, can_finance) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                 ON CONFLICT (role, resource) DO UPDATE SET \
                     can_view = EXCLUDED.can_view, can_create = EXCLUDED.can_create, \
                     can_edit = EXCLUDED.can_edit, can_delete = EXCLUDED.can_delete, \
                     can_export = EXCLUDED.can_export, can_finance = EXCLUDED.can_finance",
            )
            .bind(entry.role)
            .bind(entry.resource)
            .bind(entry.can_view)
            .bind(entry.can_create)
            .bind(entry.can_edit)
            .bind(entry.can_delete)
            .bind(entry.can_export)
            .bind(entry.can_finance)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to upsert role default", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit role defaults", e)
        })
    }

    /// Bulk upsert of per-account overrides. Entries whose flags are all
    /// null are deleted instead of stored, falling back fully to the role
    /// defaults.
    pub async fn upsert_overrides(&self, overrides: &[PermissionOverride]) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        for entry in overrides {
            if entry.is_empty() {
                sqlx::query(
                    "DELETE FROM permission_overrides WHERE account_id = $1 AND resource = $2",
                )
                .bind(entry.account_id)
                .bind(entry.resource)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete empty override", e)
                })?;
                continue;
            }

            sqlx::query(
                "INSERT INTO permission_overrides \
                     (account_id, resource, can_view, can_create, can_edit, can_delete, can_export, can_finance) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                 ON CONFLICT (account_id, resource) DO UPDATE SET \
                     can_view = EXCLUDED.can_view, can_create = EXCLUDED.can_create, \
                     can_edit = EXCLUDED.can_edit, can_delete = EXCLUDED.can_delete, \
                     can_export = EXCLUDED.can_export, can_finance = EXCLUDED.can_finance",
            )
            .bind(entry.account_id)
            .bind(entry.resource)
            .bind(entry.can_view)
            .bind(entry.can_create)
            .bind(entry.can_edit)
            .bind(entry.can_delete)
            .bind(entry.can_export)
            .bind(entry.can_finance)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to upsert override", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit overrides", e)
        })
    }

    /// Delete every override for an account (full fallback to role defaults).
    pub async fn delete_overrides(&self, account_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM permission_overrides WHERE account_id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete overrides", e)
            })?;
        Ok(result.rows_affected())
    }
}
