//! JWT Token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const JWT_ISSUER: &str = "evswap";

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
    /// Issuer claim
    pub issuer: String,
}

impl JwtConfig {
    /// Build from a configured secret. An empty secret is replaced by a
    /// random one, which invalidates tokens across restarts.
    pub fn new(secret: &str, expiration_hours: i64) -> Self {
        let secret = if secret.is_empty() {
            generate_secret()
        } else {
            secret.to_string()
        };
        Self {
            secret,
            expiration_hours,
            issuer: JWT_ISSUER.to_string(),
        }
    }
}

fn generate_secret() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(bytes)
}

/// JWT TokenClaims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    pub username: String,
    /// User role (admin, staff, driver)
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub iss: String,
}

impl TokenClaims {
    pub fn new(user_id: &str, username: &str, role: &str, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.expiration_hours);

        Self {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Create a JWT token for a user
pub fn create_token(
    user_id: &str,
    username: &str,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = TokenClaims::new(user_id, username, role, config);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify and decode a JWT token
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

/// Authentication failures surfaced by the HTTP middleware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Missing authentication token")]
    MissingToken,
    #[error("Invalid authentication token")]
    InvalidToken,
    #[error("Token has expired")]
    ExpiredToken,
    #[error("Insufficient permissions")]
    InsufficientPermissions,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig::new("test-secret", 24)
    }

    #[test]
    fn test_create_and_verify_token() {
        let config = config();
        let token = create_token("user-123", "driver1", "driver", &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.username, "driver1");
        assert_eq!(claims.role, "driver");
        assert_eq!(claims.iss, JWT_ISSUER);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_invalid_token() {
        assert!(verify_token("invalid-token", &config()).is_err());
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = create_token("u", "n", "admin", &JwtConfig::new("other", 1)).unwrap();
        assert!(verify_token(&token, &config()).is_err());
    }

    #[test]
    fn empty_secret_is_replaced() {
        let a = JwtConfig::new("", 1);
        let b = JwtConfig::new("", 1);
        assert_eq!(a.secret.len(), 64);
        assert_ne!(a.secret, b.secret);
    }
}
