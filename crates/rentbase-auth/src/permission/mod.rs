//! Effective permission resolution: role defaults merged with per-account
//! overrides.

pub mod resolver;

pub use resolver::PermissionResolver;
