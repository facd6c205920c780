//! The authenticated caller, as seen by services

use crate::domain::{DomainError, DomainResult, UserRole};

#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: String,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// Staff see everything; drivers only their own records.
    pub fn ensure_can_access(&self, owner_id: &str, entity: &str) -> DomainResult<()> {
        if self.role.is_staff() || self.user_id == owner_id {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "{} belongs to another user",
                entity
            )))
        }
    }
}
