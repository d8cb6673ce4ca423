//! JWT token validation.
//!
//! Validation is pure: signature + expiry against the local key, no store
//! round-trip. Statefulness (the single-active-token check) lives in
//! [`super::service::TokenService`].

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use rentbase_core::config::auth::AuthConfig;
use rentbase_core::error::AppError;

use super::claims::{Claims, TokenType};

/// Validates JWT tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;

        if claims.token_type != TokenType::Access {
            return Err(AppError::unauthorized("Invalid token"));
        }

        Ok(claims)
    }

    /// Decodes and validates a refresh token string.
    pub fn decode_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;

        if claims.token_type != TokenType::Refresh {
            return Err(AppError::unauthorized("Invalid token"));
        }

        Ok(claims)
    }

    /// Internal decode without type checking. Failure details stay out of
    /// the caller-facing message.
    fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::unauthorized("Token has expired")
                }
                _ => AppError::unauthorized("Invalid token"),
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::JwtEncoder;
    use chrono::Utc;
    use rentbase_entity::account::{Account, AccountRole, AccountStatus};
    use uuid::Uuid;

    fn test_account() -> Account {
        let now = Utc::now();
        Account {
            id: Uuid::new_v4(),
            email: "regional@x.com".into(),
            password_hash: None,
            display_name: None,
            role: AccountRole::Regional,
            city_id: Some(Uuid::new_v4()),
            unit_id: None,
            status: AccountStatus::Active,
            failed_attempts: 0,
            locked_until: None,
            refresh_token: None,
            refresh_token_expires_at: None,
            reset_token: None,
            reset_token_expires_at: None,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".into(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let config = config();
        let account = test_account();
        let pair = JwtEncoder::new(&config).generate_token_pair(&account).unwrap();

        let decoder = JwtDecoder::new(&config);
        let claims = decoder.decode_access_token(&pair.access_token).unwrap();
        assert_eq!(claims.sub, account.id);
        assert_eq!(claims.email, account.email);
        assert_eq!(claims.role, AccountRole::Regional);
        assert_eq!(claims.city_id, account.city_id);

        let refresh = decoder.decode_refresh_token(&pair.refresh_token).unwrap();
        assert_eq!(refresh.token_type, TokenType::Refresh);
    }

    #[test]
    fn test_token_type_is_enforced() {
        let config = config();
        let pair = JwtEncoder::new(&config)
            .generate_token_pair(&test_account())
            .unwrap();

        let decoder = JwtDecoder::new(&config);
        assert!(decoder.decode_access_token(&pair.refresh_token).is_err());
        assert!(decoder.decode_refresh_token(&pair.access_token).is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let pair = JwtEncoder::new(&config())
            .generate_token_pair(&test_account())
            .unwrap();

        let other = AuthConfig {
            jwt_secret: "other-secret".into(),
            ..AuthConfig::default()
        };
        assert!(
            JwtDecoder::new(&other)
                .decode_access_token(&pair.access_token)
                .is_err()
        );
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let config = config();
        let pair = JwtEncoder::new(&config)
            .generate_token_pair(&test_account())
            .unwrap();

        let mut tampered = pair.access_token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });
        assert!(JwtDecoder::new(&config).decode_access_token(&tampered).is_err());
    }
}
