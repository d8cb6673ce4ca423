//! Tenant scoping predicates and account-modification hierarchy checks.

pub mod resolver;

pub use resolver::{ScopePredicate, can_assign_role, can_modify_account, city_filter, unit_filter};
