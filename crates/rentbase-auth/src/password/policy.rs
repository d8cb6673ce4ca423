//! Password policy enforcement for new passwords.

use rentbase_core::config::auth::AuthConfig;
use rentbase_core::error::AppError;

/// Validates password strength against the configured policy: minimum
/// length plus at least one uppercase letter, one lowercase letter, and
/// one digit.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// Minimum password length.
    min_length: usize,
}

impl PasswordPolicy {
    /// Creates a new policy from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Validates a password against all configured rules.
    ///
    /// Returns `Ok(())` if the password meets all requirements, or a
    /// `BadRequest` describing the first violation found.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::bad_request(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if !password.chars().any(|c| c.is_uppercase()) {
            return Err(AppError::bad_request(
                "Password must contain at least one uppercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_lowercase()) {
            return Err(AppError::bad_request(
                "Password must contain at least one lowercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::bad_request(
                "Password must contain at least one digit",
            ));
        }

        Ok(())
    }

    /// Validates that a new password differs from the current one.
    pub fn validate_not_same(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if current_password == new_password {
            return Err(AppError::bad_request(
                "New password must be different from the current password",
            ));
        }
        Ok(())
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new(&AuthConfig::default())
    }
}
