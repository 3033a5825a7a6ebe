//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use devlink_core::config::auth::AuthConfig;
use devlink_core::error::AppError;

use super::claims::Claims;

/// Validates JWT access tokens issued by the account system.
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
        validation.leeway = config.leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::authentication(format!("Invalid token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use uuid::Uuid;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            leeway_seconds: 5,
        }
    }

    fn token(secret: &str, exp_offset: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            username: "alice".to_string(),
            iat: now,
            exp: now + exp_offset,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encode")
    }

    #[test]
    fn test_decode_valid_token() {
        let decoder = JwtDecoder::new(&config());
        let claims = decoder.decode(&token("test-secret", 600)).expect("decode");
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn test_decode_rejects_wrong_secret() {
        let decoder = JwtDecoder::new(&config());
        assert!(decoder.decode(&token("other-secret", 600)).is_err());
    }

    #[test]
    fn test_decode_rejects_expired_token() {
        let decoder = JwtDecoder::new(&config());
        assert!(decoder.decode(&token("test-secret", -600)).is_err());
    }
}
