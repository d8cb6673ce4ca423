//! Account role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in the platform.
///
/// Roles form a strict total order: Owner > Admin > Regional > Unit.
/// The order drives both permission defaults and the account-modification
/// hierarchy, so it is a fixed map rather than anything inferred at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// Platform owner. Sees all tenants.
    Owner,
    /// Central administrator. Sees all tenants.
    Admin,
    /// Regional manager, scoped to one city.
    Regional,
    /// Franchise-unit operator, scoped to one unit within a city.
    Unit,
}

impl AccountRole {
    /// Return the rank in the total order (higher = more privileged).
    pub fn rank(&self) -> u8 {
        match self {
            Self::Owner => 4,
            Self::Admin => 3,
            Self::Regional => 2,
            Self::Unit => 1,
        }
    }

    /// Whether this role sits above all tenant scoping (sees every city
    /// and unit).
    pub fn is_top_tier(&self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }

    /// Whether accounts with this role must carry a city id.
    pub fn requires_city(&self) -> bool {
        matches!(self, Self::Regional | Self::Unit)
    }

    /// Whether accounts with this role must carry a unit id.
    pub fn requires_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Regional => "regional",
            Self::Unit => "unit",
        }
    }

    /// All roles, highest rank first.
    pub fn all() -> [AccountRole; 4] {
        [Self::Owner, Self::Admin, Self::Regional, Self::Unit]
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccountRole {
    type Err = rentbase_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "regional" => Ok(Self::Regional),
            "unit" => Ok(Self::Unit),
            _ => Err(rentbase_core::AppError::bad_request(format!(
                "Invalid account role: '{s}'. Expected one of: owner, admin, regional, unit"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_total_order() {
        assert!(AccountRole::Owner.rank() > AccountRole::Admin.rank());
        assert!(AccountRole::Admin.rank() > AccountRole::Regional.rank());
        assert!(AccountRole::Regional.rank() > AccountRole::Unit.rank());
    }

    #[test]
    fn test_tenant_requirements() {
        assert!(!AccountRole::Owner.requires_city());
        assert!(!AccountRole::Admin.requires_city());
        assert!(AccountRole::Regional.requires_city());
        assert!(!AccountRole::Regional.requires_unit());
        assert!(AccountRole::Unit.requires_city());
        assert!(AccountRole::Unit.requires_unit());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("owner".parse::<AccountRole>().unwrap(), AccountRole::Owner);
        assert_eq!("UNIT".parse::<AccountRole>().unwrap(), AccountRole::Unit);
        assert!("superuser".parse::<AccountRole>().is_err());
    }
}
