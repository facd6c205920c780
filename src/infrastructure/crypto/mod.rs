//! Cryptographic helpers: JWT, password hashing, gateway signatures

pub mod jwt;
pub mod password;
pub mod payment_signature;

pub use jwt::{create_token, verify_token, AuthError, JwtConfig, TokenClaims};
pub use password::{hash_password, verify_password};
pub use payment_signature::{canonical_query, sign_params, verify_params};
