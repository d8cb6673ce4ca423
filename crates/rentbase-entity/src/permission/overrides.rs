//! Per-account permission overrides.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::resource::Resource;
use super::set::PermissionSet;

/// Account-specific exception to the role defaults for one resource.
///
/// Each flag is tri-state: `None` inherits the role default, `Some(_)`
/// unconditionally replaces it for this account and resource only. Rows are
/// created and deleted by administrative action alone; a row whose flags are
/// all null is deleted rather than stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PermissionOverride {
    /// The account the exception applies to.
    pub account_id: Uuid,
    /// The protected resource.
    pub resource: Resource,
    /// Override for the view flag, if set.
    pub can_view: Option<bool>,
    /// Override for the create flag, if set.
    pub can_create: Option<bool>,
    /// Override for the edit flag, if set.
    pub can_edit: Option<bool>,
    /// Override for the delete flag, if set.
    pub can_delete: Option<bool>,
    /// Override for the export flag, if set.
    pub can_export: Option<bool>,
    /// Override for the finance flag, if set.
    pub can_finance: Option<bool>,
}

impl PermissionOverride {
    /// Merge this override onto a role default, per-flag: a set flag
    /// replaces the default, an unset flag inherits it.
    pub fn apply(&self, default: PermissionSet) -> PermissionSet {
        PermissionSet {
            can_view: self.can_view.unwrap_or(default.can_view),
            can_create: self.can_create.unwrap_or(default.can_create),
            can_edit: self.can_edit.unwrap_or(default.can_edit),
            can_delete: self.can_delete.unwrap_or(default.can_delete),
            can_export: self.can_export.unwrap_or(default.can_export),
            can_finance: self.can_finance.unwrap_or(default.can_finance),
        }
    }

    /// Whether every flag is null. Such an override carries no information
    /// and is deleted instead of stored.
    pub fn is_empty(&self) -> bool {
        self.can_view.is_none()
            && self.can_create.is_none()
            && self.can_edit.is_none()
            && self.can_delete.is_none()
            && self.can_export.is_none()
            && self.can_finance.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn override_for(resource: Resource) -> PermissionOverride {
        PermissionOverride {
            account_id: Uuid::new_v4(),
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
    fn test_null_inherits_non_null_overrides() {
        // Role grants delete but not edit; override sets edit only.
        let default = PermissionSet {
            can_delete: true,
            ..PermissionSet::none()
        };
        let mut ovr = override_for(Resource::Rentals);
        ovr.can_edit = Some(true);

        let resolved = ovr.apply(default);
        assert!(resolved.can_delete, "null flag must inherit the default");
        assert!(resolved.can_edit, "set flag must replace the default");
        assert!(!resolved.can_view);
    }

    #[test]
    fn test_override_can_revoke() {
        let default = PermissionSet::full();
        let mut ovr = override_for(Resource::Payments);
        ovr.can_finance = Some(false);

        let resolved = ovr.apply(default);
        assert!(!resolved.can_finance);
        assert!(resolved.can_view);
    }

    #[test]
    fn test_all_null_is_empty() {
        let mut ovr = override_for(Resource::Reports);
        assert!(ovr.is_empty());
        ovr.can_export = Some(true);
        assert!(!ovr.is_empty());
    }
}
