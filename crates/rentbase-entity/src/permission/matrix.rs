//! Role permission matrix entry.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::account::AccountRole;

use super::resource::Resource;
use super::set::PermissionSet;

/// Default action flags one role holds on one resource.
///
/// Exactly one row exists per (role, resource) pair; a missing row means
/// all flags false.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RolePermission {
    /// The role the defaults apply to.
    pub role: AccountRole,
    /// The protected resource.
    pub resource: Resource,
    /// May read rows.
    pub can_view: bool,
    /// May create rows.
    pub can_create: bool,
    /// May edit rows.
    pub can_edit: bool,
    /// May delete rows.
    pub can_delete: bool,
    /// May export rows.
    pub can_export: bool,
    /// May act on finance documents.
    pub can_finance: bool,
}

impl RolePermission {
    /// The resolved flag set this entry grants.
    pub fn as_set(&self) -> PermissionSet {
        PermissionSet {
            can_view: self.can_view,
            can_create: self.can_create,
            can_edit: self.can_edit,
            can_delete: self.can_delete,
            can_export: self.can_export,
            can_finance: self.can_finance,
        }
    }

    /// Build a matrix entry from a resolved set.
    pub fn from_set(role: AccountRole, resource: Resource, set: PermissionSet) -> Self {
        Self {
            role,
            resource,
            can_view: set.can_view,
            can_create: set.can_create,
            can_edit: set.can_edit,
            can_delete: set.can_delete,
            can_export: set.can_export,
            can_finance: set.can_finance,
        }
    }
}
