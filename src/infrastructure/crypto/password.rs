//! Password hashing utilities

use bcrypt::{hash, verify};

use crate::shared::InfraError;

#[cfg(not(test))]
const COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
const COST: u32 = 4;

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, InfraError> {
    hash(password, COST).map_err(|e| InfraError::Crypto(e.to_string()))
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, InfraError> {
    verify(password, hash).map_err(|e| InfraError::Crypto(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let h = hash_password("s3cret!").unwrap();
        assert!(verify_password("s3cret!", &h).unwrap());
        assert!(!verify_password("wrong", &h).unwrap());
    }
}
