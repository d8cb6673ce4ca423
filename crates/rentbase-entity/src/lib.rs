//! # rentbase-entity
//!
//! Domain entity models for the Rentbase auth core: accounts with their
//! role/status enumerations, the role permission matrix, and per-account
//! permission overrides.

pub mod account;
pub mod permission;

pub use account::{Account, AccountRole, AccountStatus};
pub use permission::{PermissionOverride, PermissionSet, Resource, RolePermission};
