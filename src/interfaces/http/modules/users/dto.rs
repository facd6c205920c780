//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{User, UserRole};
use crate::interfaces::http::common::{parse_enum, ApiError};

pub(crate) const ROLES: [(&str, UserRole); 3] = [
    ("admin", UserRole::Admin),
    ("staff", UserRole::Staff),
    ("driver", UserRole::Driver),
];

pub(crate) fn parse_role(value: &str) -> Result<UserRole, ApiError> {
    parse_enum(value, &ROLES)
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            phone: u.phone,
            role: u.role.to_string(),
            is_active: u.is_active,
            created_at: u.created_at,
            updated_at: u.updated_at,
            last_login_at: u.last_login_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub phone: Option<String>,
    /// `admin`, `staff` or `driver` (default)
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "driver".to_string()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUsersParams {
    /// Search by username or email
    pub search: Option<String>,
    /// Filter by role (admin, staff, driver)
    pub role: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
