//! Manage json web tokens.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

const EXPIRATION_TIME: i64 = 60 * 60 * 24 * 7; // 7 days.

/// Pieces of information asserted on a JWT.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Claims {
    /// Identifies the expiration time on or after which the JWT must not be
    /// accepted for processing.
    pub exp: i64,
    /// Identifies the time at which the JWT was issued.
    pub iat: i64,
    /// User ID.
    pub sub: String,
}

/// Manage JWT tokens.
#[derive(Clone)]
pub struct TokenManager {
    algorithm: Algorithm,
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
}

impl TokenManager {
    /// Create a new [`TokenManager`] instance from a shared secret.
    pub fn new(secret: &str) -> Self {
        Self {
            algorithm: Algorithm::HS256,
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Create a new [`jsonwebtoken`].
    pub fn create(&self, user_id: Uuid) -> Result<String> {
        let time = Utc::now().timestamp();
        let header = Header::new(self.algorithm);
        let claims = Claims {
            exp: time + EXPIRATION_TIME,
            iat: time,
            sub: user_id.to_string(),
        };

        Ok(encode(&header, &claims, &self.encoding_key)?)
    }

    /// Decode and check a token.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(self.algorithm);
        Ok(decode::<Claims>(token, &self.decoding_key, &validation)?.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_decode_round_trip() {
        let manager = TokenManager::new("secret_key_for_tests");
        let user_id = Uuid::new_v4();

        let token = manager.create(user_id).unwrap();
        let claims = manager.decode(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let manager = TokenManager::new("secret_key_for_tests");
        let time = Utc::now().timestamp();
        let claims = Claims {
            exp: time - 3600,
            iat: time - 7200,
            sub: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret_key_for_tests"),
        )
        .unwrap();

        assert!(manager.decode(&token).is_err());
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let manager = TokenManager::new("secret_key_for_tests");
        let token = TokenManager::new("another_secret")
            .create(Uuid::new_v4())
            .unwrap();

        assert!(manager.decode(&token).is_err());
    }
}
