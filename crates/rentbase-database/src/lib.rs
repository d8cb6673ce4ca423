//! # rentbase-database
//!
//! PostgreSQL connection management and concrete repository implementations
//! for the Rentbase auth core. All compare-and-set operations the auth flows
//! depend on (refresh-token rotation, reset-token consumption, failed-attempt
//! increments) live here as single SQL statements.

pub mod connection;
pub mod repositories;

pub use connection::DatabasePool;
