use chrono::{DateTime, Utc};

use crate::shared::PaginationParams;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserRole {
    Admin,
    Staff,
    #[default]
    Driver,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Driver => "driver",
        }
    }

    /// Staff-level access (station operators and admins)
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Staff)
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "admin" => Self::Admin,
            "staff" => Self::Staff,
            _ => Self::Driver,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User model
#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.into(),
            email: email.into(),
            phone: None,
            password_hash: password_hash.into(),
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }
}

/// Filters for listing users
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    /// Substring match on username or email
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub pagination: PaginationParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing_is_case_insensitive_and_defaults_to_driver() {
        assert_eq!(UserRole::from("ADMIN"), UserRole::Admin);
        assert_eq!(UserRole::from("staff"), UserRole::Staff);
        assert_eq!(UserRole::from("driver"), UserRole::Driver);
        assert_eq!(UserRole::from("someone"), UserRole::Driver);
    }

    #[test]
    fn only_admin_and_staff_are_staff() {
        assert!(UserRole::Admin.is_staff());
        assert!(UserRole::Staff.is_staff());
        assert!(!UserRole::Driver.is_staff());
    }

    #[test]
    fn new_user_is_active_with_fresh_id() {
        let a = User::new("alice", "alice@example.com", "hash", UserRole::Driver);
        let b = User::new("bob", "bob@example.com", "hash", UserRole::Driver);
        assert!(a.is_active);
        assert_ne!(a.id, b.id);
        assert!(a.last_login_at.is_none());
    }
}
