//! Account entity: identity record, role hierarchy, and status lifecycle.

pub mod model;
pub mod role;
pub mod status;

pub use model::{Account, AccountSummary, CreateAccount};
pub use role::AccountRole;
pub use status::AccountStatus;
