use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        let msg = e.to_string();
        if msg.contains("UNIQUE") || msg.contains("duplicate") {
            Self::Conflict(msg)
        } else {
            Self::Database(msg)
        }
    }
}

impl From<InfraError> for DomainError {
    fn from(e: InfraError) -> Self {
        match e {
            InfraError::Database(db) => db.into(),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_maps_to_conflict() {
        let err: DomainError =
            sea_orm::DbErr::Custom("UNIQUE constraint failed: users.email".into()).into();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn other_db_errors_map_to_database() {
        let err: DomainError = sea_orm::DbErr::Custom("disk I/O error".into()).into();
        assert!(matches!(err, DomainError::Database(_)));
    }

    #[test]
    fn crypto_failures_are_internal() {
        let err: DomainError = InfraError::Crypto("bad cost".into()).into();
        assert!(matches!(err, DomainError::Internal(_)));
    }

    #[test]
    fn not_found_message_names_entity_and_key() {
        let err = DomainError::not_found("Station", "id", 7);
        assert_eq!(err.to_string(), "Not found: Station with id=7");
    }
}
