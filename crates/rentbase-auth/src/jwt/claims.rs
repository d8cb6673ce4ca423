//! JWT claims structure used in access and refresh tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rentbase_entity::account::AccountRole;

/// JWT claims payload embedded in every token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the account ID.
    pub sub: Uuid,
    /// Login email at the time of issuance.
    pub email: String,
    /// Account role at the time of issuance.
    pub role: AccountRole,
    /// City tenant id, for scoped roles.
    pub city_id: Option<Uuid>,
    /// Unit tenant id, for unit roles.
    pub unit_id: Option<Uuid>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token type: "access" or "refresh".
    pub token_type: TokenType,
}

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Credential for API requests.
    Access,
    /// Credential used solely to obtain a new token pair.
    Refresh,
}

impl Claims {
    /// Returns the account ID from the subject claim.
    pub fn account_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_check() {
        let now = Utc::now().timestamp();
        let live = Claims {
            sub: Uuid::new_v4(),
            email: "a@x.com".into(),
            role: AccountRole::Admin,
            city_id: None,
            unit_id: None,
            iat: now,
            exp: now + 60,
            token_type: TokenType::Access,
        };
        assert!(!live.is_expired());

        let dead = Claims { exp: now - 60, ..live };
        assert!(dead.is_expired());
    }
}
