//! Fully-resolved permission flags for one resource.

use serde::{Deserialize, Serialize};

/// The concrete action flags a caller holds on one resource.
///
/// Every flag is a resolved boolean; a resolved set never carries "inherit"
/// holes. `finance` is the resource-specific flag, only meaningful for
/// finance-bearing resources (payments) and false elsewhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    /// May read rows of the resource.
    pub can_view: bool,
    /// May create rows.
    pub can_create: bool,
    /// May edit rows.
    pub can_edit: bool,
    /// May delete rows.
    pub can_delete: bool,
    /// May export rows (CSV/PDF).
    pub can_export: bool,
    /// May act on finance documents.
    pub can_finance: bool,
}

impl PermissionSet {
    /// The deny-everything set. The fallback for any missing matrix entry,
    /// so a misconfigured resource defaults closed.
    pub fn none() -> Self {
        Self::default()
    }

    /// The allow-everything set.
    pub fn full() -> Self {
        Self {
            can_view: true,
            can_create: true,
            can_edit: true,
            can_delete: true,
            can_export: true,
            can_finance: true,
        }
    }

    /// Whether any flag is granted.
    pub fn any(&self) -> bool {
        self.can_view
            || self.can_create
            || self.can_edit
            || self.can_delete
            || self.can_export
            || self.can_finance
    }
}
