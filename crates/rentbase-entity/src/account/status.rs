//! Account status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Registered but not yet activated (no completed first reset/login).
    Pending,
    /// Active and allowed to log in.
    Active,
    /// Soft-deleted by an administrator. Accounts are never hard-deleted.
    Inactive,
    /// Blocked by an administrator.
    Blocked,
}

impl AccountStatus {
    /// Check whether this status permits login.
    pub fn can_login(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = rentbase_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "blocked" => Ok(Self::Blocked),
            _ => Err(rentbase_core::AppError::bad_request(format!(
                "Invalid account status: '{s}'. Expected one of: pending, active, inactive, blocked"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_active_can_login() {
        assert!(AccountStatus::Active.can_login());
        assert!(!AccountStatus::Pending.can_login());
        assert!(!AccountStatus::Inactive.can_login());
        assert!(!AccountStatus::Blocked.can_login());
    }
}
