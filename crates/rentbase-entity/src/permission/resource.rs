//! Protected resource enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of protected resources the permission matrix covers.
///
/// Business routes outside this core consume the resolved flags; adding a
/// resource here is a schema change, not a runtime event.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "resource", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    /// Account administration.
    Accounts,
    /// Rental listings and bookings.
    Rentals,
    /// Rental contracts and generated documents.
    Contracts,
    /// Vehicle/property inspections.
    Inspections,
    /// Payments and finance documents.
    Payments,
    /// Dashboard aggregation and exports.
    Reports,
}

impl Resource {
    /// All known resources, in matrix order.
    pub fn all() -> [Resource; 6] {
        [
            Self::Accounts,
            Self::Rentals,
            Self::Contracts,
            Self::Inspections,
            Self::Payments,
            Self::Reports,
        ]
    }

    /// Return the resource as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accounts => "accounts",
            Self::Rentals => "rentals",
            Self::Contracts => "contracts",
            Self::Inspections => "inspections",
            Self::Payments => "payments",
            Self::Reports => "reports",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Resource {
    type Err = rentbase_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accounts" => Ok(Self::Accounts),
            "rentals" => Ok(Self::Rentals),
            "contracts" => Ok(Self::Contracts),
            "inspections" => Ok(Self::Inspections),
            "payments" => Ok(Self::Payments),
            "reports" => Ok(Self::Reports),
            _ => Err(rentbase_core::AppError::bad_request(format!(
                "Unknown resource: '{s}'"
            ))),
        }
    }
}
