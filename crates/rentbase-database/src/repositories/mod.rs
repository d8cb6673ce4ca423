//! Concrete repository implementations.

pub mod account;
pub mod permission;

pub use account::AccountRepository;
pub use permission::PermissionRepository;
