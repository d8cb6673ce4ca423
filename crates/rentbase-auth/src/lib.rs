//! # rentbase-auth
//!
//! Authentication and authorization core for the Rentbase platform.
//!
//! ## Modules
//!
//! - `password` — Argon2id password hashing and policy enforcement
//! - `jwt` — token claims, signing, validation, and rotation
//! - `credential` — credential verification with lockout tracking
//! - `permission` — role-default + override permission resolution
//! - `scope` — pure tenant-scoping predicates and modify-hierarchy checks
//! - `reset` — one-time, time-boxed password reset tokens
//! - `session` — login/refresh/logout orchestration and expiry sweeping

pub mod credential;
pub mod jwt;
pub mod password;
pub mod permission;
pub mod reset;
pub mod scope;
pub mod session;

pub use credential::CredentialVerifier;
pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenService};
pub use password::{PasswordHasher, PasswordPolicy};
pub use permission::PermissionResolver;
pub use reset::PasswordResetFlow;
pub use scope::{ScopePredicate, can_assign_role, can_modify_account, city_filter, unit_filter};
pub use session::{ExpirySweeper, SessionLifecycle};
