//! Account entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::AccountRole;
use super::status::AccountStatus;

/// An identity record in the Rentbase platform.
///
/// Which tenant fields are meaningful depends on the role: regional roles
/// carry `city_id`, unit roles carry `city_id` + `unit_id`, top-tier roles
/// carry neither and see all tenants.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Unique account identifier.
    pub id: Uuid,
    /// Unique login email.
    pub email: String,
    /// Argon2 password hash. Null until the holder completes first setup.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Human-readable display name.
    pub display_name: Option<String>,
    /// Role in the fixed hierarchy.
    pub role: AccountRole,
    /// City (region) tenant id, for regional- and unit-scoped roles.
    pub city_id: Option<Uuid>,
    /// Franchise-unit tenant id, for unit-scoped roles.
    pub unit_id: Option<Uuid>,
    /// Lifecycle status.
    pub status: AccountStatus,
    /// Consecutive failed login attempts.
    pub failed_attempts: i32,
    /// Login is blocked until this time, if set and in the future.
    pub locked_until: Option<DateTime<Utc>>,
    /// The single active refresh token value, if a session exists.
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    /// Expiry of the stored refresh token.
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
    /// Outstanding one-time password-reset token.
    #[serde(skip_serializing)]
    pub reset_token: Option<String>,
    /// Expiry of the outstanding reset token.
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Check if the account is currently locked out.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }

    /// Minutes remaining on the lockout window, rounded up. Zero when not
    /// locked. Safe to disclose to the caller.
    pub fn lockout_minutes_remaining(&self, now: DateTime<Utc>) -> i64 {
        match self.locked_until {
            Some(until) if until > now => {
                let secs = (until - now).num_seconds();
                (secs + 59) / 60
            }
            _ => 0,
        }
    }

    /// A projection of the account safe to hand to the route layer.
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id,
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            role: self.role,
            city_id: self.city_id,
            unit_id: self.unit_id,
            status: self.status,
        }
    }
}

/// Public, credential-free view of an account returned from login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Account identifier.
    pub id: Uuid,
    /// Login email.
    pub email: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Role.
    pub role: AccountRole,
    /// City tenant id, if scoped.
    pub city_id: Option<Uuid>,
    /// Unit tenant id, if scoped.
    pub unit_id: Option<Uuid>,
    /// Lifecycle status.
    pub status: AccountStatus,
}

/// Data required to provision a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccount {
    /// Login email (must be unique).
    pub email: String,
    /// Pre-hashed password, if set at provisioning time.
    pub password_hash: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Assigned role.
    pub role: AccountRole,
    /// City tenant id, for scoped roles.
    pub city_id: Option<Uuid>,
    /// Unit tenant id, for unit roles.
    pub unit_id: Option<Uuid>,
    /// Initial status: `Pending` for self-registration, `Active` for admin
    /// provisioning.
    pub status: AccountStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn account_locked_for(minutes: i64) -> Account {
        let now = Utc::now();
        Account {
            id: Uuid::new_v4(),
            email: "a@x.com".into(),
            password_hash: None,
            display_name: None,
            role: AccountRole::Unit,
            city_id: Some(Uuid::new_v4()),
            unit_id: Some(Uuid::new_v4()),
            status: AccountStatus::Active,
            failed_attempts: 5,
            locked_until: Some(now + Duration::minutes(minutes)),
            refresh_token: None,
            refresh_token_expires_at: None,
            reset_token: None,
            reset_token_expires_at: None,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    #[test]
    fn test_lockout_minutes_rounds_up() {
        let account = account_locked_for(15);
        let now = Utc::now();
        assert!(account.is_locked(now));
        assert_eq!(account.lockout_minutes_remaining(now), 15);
    }

    #[test]
    fn test_expired_lockout_is_not_locked() {
        let mut account = account_locked_for(15);
        account.locked_until = Some(Utc::now() - Duration::minutes(1));
        let now = Utc::now();
        assert!(!account.is_locked(now));
        assert_eq!(account.lockout_minutes_remaining(now), 0);
    }
}
