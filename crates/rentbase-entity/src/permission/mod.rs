//! Permission matrix entities: resources, action-flag sets, role defaults,
//! and per-account overrides.

pub mod matrix;
pub mod overrides;
pub mod resource;
pub mod set;

pub use matrix::RolePermission;
pub use overrides::PermissionOverride;
pub use resource::Resource;
pub use set::PermissionSet;
