//! Merges the role permission matrix with per-account overrides into a
//! complete effective permission table.
//!
//! Resolution is a pure function of current matrix + override state: no
//! cache sits between a mutation and the next resolve, so results are
//! never stale. Missing data resolves to all-false — a misconfigured
//! resource defaults closed, never open.

use std::collections::BTreeMap;
use std::sync::Arc;

use uuid::Uuid;

use rentbase_core::result::AppResult;
use rentbase_database::repositories::PermissionRepository;
use rentbase_entity::account::AccountRole;
use rentbase_entity::permission::{PermissionOverride, PermissionSet, Resource, RolePermission};

/// Resolves effective permissions per resource for an account.
#[derive(Clone)]
pub struct PermissionResolver {
    permissions: Arc<PermissionRepository>,
}

impl std::fmt::Debug for PermissionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionResolver").finish()
    }
}

impl PermissionResolver {
    /// Creates a new resolver over the permission store.
    pub fn new(permissions: Arc<PermissionRepository>) -> Self {
        Self { permissions }
    }

    /// Resolves the complete permission table for an account: for every
    /// known resource, the role default (all-false if the matrix has no
    /// entry) with the account's override applied per flag.
    pub async fn resolve(
        &self,
        account_id: Uuid,
        role: AccountRole,
    ) -> AppResult<BTreeMap<Resource, PermissionSet>> {
        let defaults = self.permissions.find_role_defaults(role).await?;
        let overrides = self.permissions.find_overrides(account_id).await?;

        Ok(merge(&defaults, &overrides))
    }

    /// Administrative bulk upsert of a role's matrix entries.
    pub async fn set_role_defaults(&self, entries: &[RolePermission]) -> AppResult<()> {
        self.permissions.upsert_role_defaults(entries).await
    }

    /// Administrative bulk upsert of an account's overrides. All-null
    /// entries are deleted, falling back fully to the role defaults.
    pub async fn set_overrides(&self, overrides: &[PermissionOverride]) -> AppResult<()> {
        self.permissions.upsert_overrides(overrides).await
    }

    /// Deletes every override for an account, restoring pure role defaults.
    /// Returns the number of overrides removed.
    pub async fn clear_overrides(&self, account_id: Uuid) -> AppResult<u64> {
        self.permissions.delete_overrides(account_id).await
    }
}

/// The merge rule, kept free of I/O so it is exhaustively testable: for
/// every known resource, `override.flag ?? role_default.flag`, with a
/// missing matrix entry contributing all-false. The result has an entry
/// for every resource and no unresolved holes.
pub fn merge(
    defaults: &[RolePermission],
    overrides: &[PermissionOverride],
) -> BTreeMap<Resource, PermissionSet> {
    let mut table = BTreeMap::new();

    for resource in Resource::all() {
        let base = defaults
            .iter()
            .find(|d| d.resource == resource)
            .map(|d| d.as_set())
            .unwrap_or_else(PermissionSet::none);

        let resolved = overrides
            .iter()
            .find(|o| o.resource == resource)
            .map(|o| o.apply(base))
            .unwrap_or(base);

        table.insert(resource, resolved);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_entry(resource: Resource, set: PermissionSet) -> RolePermission {
        RolePermission::from_set(AccountRole::Unit, resource, set)
    }

    fn blank_override(account_id: Uuid, resource: Resource) -> PermissionOverride {
        PermissionOverride {
            account_id,
            resource,
            can_view: None,
            can_create: None,
            can_edit: None,
            can_delete: None,
            can_export: None,
            can_finance: None,
        }
    }

    #[test]
    fn test_every_resource_is_present_with_no_matrix() {
        let table = merge(&[], &[]);
        assert_eq!(table.len(), Resource::all().len());
        for set in table.values() {
            assert_eq!(*set, PermissionSet::none());
        }
    }

    #[test]
    fn test_null_inherits_non_null_replaces() {
        // Role default: delete yes, edit no. Override: edit yes, delete null.
        let defaults = [default_entry(
            Resource::Rentals,
            PermissionSet {
                can_delete: true,
                ..PermissionSet::none()
            },
        )];
        let mut ovr = blank_override(Uuid::new_v4(), Resource::Rentals);
        ovr.can_edit = Some(true);

        let table = merge(&defaults, &[ovr]);
        let rentals = table[&Resource::Rentals];
        assert!(rentals.can_delete);
        assert!(rentals.can_edit);
        assert!(!rentals.can_view);
    }

    #[test]
    fn test_export_override_applies_to_one_resource_only() {
        // Role forbids export everywhere; the override grants it on rentals.
        let defaults: Vec<RolePermission> = Resource::all()
            .into_iter()
            .map(|r| {
                default_entry(
                    r,
                    PermissionSet {
                        can_view: true,
                        ..PermissionSet::none()
                    },
                )
            })
            .collect();
        let mut ovr = blank_override(Uuid::new_v4(), Resource::Rentals);
        ovr.can_export = Some(true);

        let table = merge(&defaults, &[ovr]);
        assert!(table[&Resource::Rentals].can_export);
        assert!(!table[&Resource::Contracts].can_export);
        assert!(!table[&Resource::Payments].can_export);
    }

    #[test]
    fn test_override_on_missing_matrix_entry_starts_from_all_false() {
        let mut ovr = blank_override(Uuid::new_v4(), Resource::Reports);
        ovr.can_view = Some(true);

        let table = merge(&[], &[ovr]);
        let reports = table[&Resource::Reports];
        assert!(reports.can_view);
        assert!(!reports.can_create);
    }
}
