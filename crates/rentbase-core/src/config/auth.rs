//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token TTL in days.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_days: i64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: i64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Maximum failed login attempts before lockout.
    #[serde(default = "default_max_failed")]
    pub max_failed_attempts: i32,
    /// Account lockout duration in minutes.
    #[serde(default = "default_lockout")]
    pub lockout_duration_minutes: i64,
    /// Password reset token TTL in hours.
    #[serde(default = "default_reset_ttl")]
    pub reset_token_ttl_hours: i64,
    /// Timeout in seconds for outbound mail delivery.
    #[serde(default = "default_mailer_timeout")]
    pub mailer_timeout_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            access_ttl_days: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
            password_min_length: default_password_min(),
            max_failed_attempts: default_max_failed(),
            lockout_duration_minutes: default_lockout(),
            reset_token_ttl_hours: default_reset_ttl(),
            mailer_timeout_seconds: default_mailer_timeout(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_access_ttl() -> i64 {
    7
}

fn default_refresh_ttl() -> i64 {
    30
}

fn default_password_min() -> usize {
    8
}

fn default_max_failed() -> i32 {
    5
}

fn default_lockout() -> i64 {
    15
}

fn default_reset_ttl() -> i64 {
    2
}

fn default_mailer_timeout() -> u64 {
    10
}
