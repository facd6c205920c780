//! User management service
//!
//! All user-related business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::{
    AppointmentQuery, AppointmentStatus, DomainError, DomainResult, RepositoryProvider, User,
    UserQuery, UserRole,
};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::shared::{InfraError, PaginatedResult, PaginationParams};

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Input for creating an account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: UserRole,
}

/// Admin-editable profile fields; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

/// Orchestrates the identity and user-management use-cases.
pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self { repos, jwt_config }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate user by username/email + password and return a JWT.
    pub async fn login(&self, username_or_email: &str, password: &str) -> DomainResult<AuthResult> {
        let users = self.repos.users();
        let user = match users.find_by_username(username_or_email).await? {
            Some(u) => Some(u),
            None => users.find_by_email(username_or_email).await?,
        };

        let Some(user) = user else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if !user.is_active {
            return Err(DomainError::Unauthorized("Account is disabled".into()));
        }

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        let token = create_token(&user.id, &user.username, user.role.as_str(), &self.jwt_config)
            .map_err(|e| InfraError::Crypto(format!("Failed to create token: {}", e)))?;

        users.touch_last_login(&user.id).await?;
        info!(user_id = %user.id, username = %user.username, "User logged in");

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    // ── Registration ────────────────────────────────────────────

    /// Self-service sign-up. Always creates a driver account.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        phone: Option<String>,
    ) -> DomainResult<User> {
        let user = self
            .create_user(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                phone,
                role: UserRole::Driver,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "New user registered");
        Ok(user)
    }

    /// Create an account with an explicit role.
    pub async fn create_user(&self, input: NewUser) -> DomainResult<User> {
        if input.username.len() < 3 || input.username.len() > 50 {
            return Err(DomainError::Validation(
                "Username must be 3-50 characters".into(),
            ));
        }
        if input.password.len() < 8 {
            return Err(DomainError::Validation(
                "Password must be at least 8 characters".into(),
            ));
        }
        if !input.email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".into()));
        }

        let users = self.repos.users();
        if users.find_by_username(&input.username).await?.is_some() {
            return Err(DomainError::Conflict("Username already exists".into()));
        }
        if users.find_by_email(&input.email).await?.is_some() {
            return Err(DomainError::Conflict("Email already exists".into()));
        }

        let password_hash = hash_password(&input.password)?;

        let mut user = User::new(input.username, input.email, password_hash, input.role);
        user.phone = input.phone;
        users.create(user).await
    }

    /// Create the bootstrap admin if the user table is empty.
    ///
    /// Returns `true` when an account was created.
    pub async fn ensure_default_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<bool> {
        if self.repos.users().count().await? > 0 {
            return Ok(false);
        }

        let admin = self
            .create_user(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                phone: None,
                role: UserRole::Admin,
            })
            .await?;
        info!(user_id = %admin.id, username = %admin.username, "Default admin account created");
        Ok(true)
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn list_users(&self, query: UserQuery) -> DomainResult<PaginatedResult<User>> {
        self.repos.users().list(query).await
    }

    pub async fn get_user(&self, id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", id))
    }

    // ── Commands (mutations) ────────────────────────────────────

    pub async fn update_user(&self, id: &str, changes: UserChanges) -> DomainResult<User> {
        let mut user = self.get_user(id).await?;

        if let Some(email) = changes.email {
            if !email.contains('@') {
                return Err(DomainError::Validation("Invalid email address".into()));
            }
            if email != user.email {
                if self.repos.users().find_by_email(&email).await?.is_some() {
                    return Err(DomainError::Conflict("Email already exists".into()));
                }
                user.email = email;
            }
        }
        if let Some(phone) = changes.phone {
            user.phone = Some(phone);
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(is_active) = changes.is_active {
            user.is_active = is_active;
        }
        user.updated_at = Utc::now();

        let user = self.repos.users().update(user).await?;
        info!(user_id = %user.id, role = %user.role, "User updated");
        Ok(user)
    }

    /// Change a user's password. Verifies the current password first.
    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        if new_password.len() < 8 {
            return Err(DomainError::Validation(
                "New password must be at least 8 characters".into(),
            ));
        }

        let mut user = self.get_user(user_id).await?;

        let valid = verify_password(current_password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid current password".into()));
        }

        user.password_hash = hash_password(new_password)?;
        self.repos.users().update(user).await?;

        info!(user_id, "Password changed");
        Ok(())
    }

    /// Delete a user. Admins cannot delete their own account, and users
    /// with confirmed bookings keep their slots locked until those close.
    pub async fn delete_user(&self, id: &str, acting_user_id: &str) -> DomainResult<()> {
        if id == acting_user_id {
            return Err(DomainError::Conflict("Cannot delete your own account".into()));
        }
        self.get_user(id).await?;
        let open = self
            .repos
            .appointments()
            .list(AppointmentQuery {
                user_id: Some(id.to_string()),
                status: Some(AppointmentStatus::Confirmed),
                pagination: PaginationParams::new(Some(1), Some(1)),
                ..Default::default()
            })
            .await?;
        if open.total > 0 {
            return Err(DomainError::Conflict(format!(
                "User {} has {} open bookings",
                id, open.total
            )));
        }
        self.repos.users().delete(id).await?;
        info!(user_id = id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::repos;

    async fn service() -> UserService {
        UserService::new(repos().await, JwtConfig::new("test-secret", 1))
    }

    #[tokio::test]
    async fn register_creates_driver_and_login_works() {
        let svc = service().await;
        let user = svc
            .register("driver1", "d1@evswap.io", "password123", None)
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Driver);

        let auth = svc.login("d1@evswap.io", "password123").await.unwrap();
        assert_eq!(auth.user.id, user.id);
        assert_eq!(auth.token_type, "Bearer");
        assert_eq!(auth.expires_in, 3600);

        let reloaded = svc.get_user(&user.id).await.unwrap();
        assert!(reloaded.last_login_at.is_some());
    }

    #[tokio::test]
    async fn wrong_password_and_disabled_account_are_unauthorized() {
        let svc = service().await;
        let user = svc
            .register("driver1", "d1@evswap.io", "password123", None)
            .await
            .unwrap();

        let err = svc.login("driver1", "nope-nope").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        svc.update_user(
            &user.id,
            UserChanges {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let err = svc.login("driver1", "password123").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn duplicate_registration_is_conflict() {
        let svc = service().await;
        svc.register("driver1", "d1@evswap.io", "password123", None)
            .await
            .unwrap();
        let err = svc
            .register("driver1", "other@evswap.io", "password123", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn change_password_requires_current() {
        let svc = service().await;
        let user = svc
            .register("driver1", "d1@evswap.io", "password123", None)
            .await
            .unwrap();

        let err = svc
            .change_password(&user.id, "wrong-current", "newpassword1")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        svc.change_password(&user.id, "password123", "newpassword1")
            .await
            .unwrap();
        assert!(svc.login("driver1", "newpassword1").await.is_ok());
    }

    #[tokio::test]
    async fn default_admin_only_on_empty_table() {
        let svc = service().await;
        assert!(svc
            .ensure_default_admin("admin", "admin@evswap.io", "admin12345")
            .await
            .unwrap());
        assert!(!svc
            .ensure_default_admin("admin2", "admin2@evswap.io", "admin12345")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn admin_cannot_delete_self() {
        let svc = service().await;
        let user = svc
            .register("driver1", "d1@evswap.io", "password123", None)
            .await
            .unwrap();
        let err = svc.delete_user(&user.id, &user.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        svc.delete_user(&user.id, "someone-else").await.unwrap();
        assert!(matches!(
            svc.get_user(&user.id).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn user_with_open_booking_cannot_be_deleted() {
        use crate::application::test_support::{
            seed_active_subscription, seed_plan, seed_station, seed_user,
        };
        use crate::application::{Actor, BookingPolicy, BookingService, SlotLockService};
        use crate::domain::SlotStatus;

        let repos = repos().await;
        let svc = UserService::new(repos.clone(), JwtConfig::new("test-secret", 1));
        let driver = seed_user(&repos, "driver1", UserRole::Driver).await;
        let (station, _) = seed_station(&repos, 2, 0).await;
        let plan = seed_plan(&repos, 2, 5).await;
        let subscription = seed_active_subscription(&repos, &driver.id, &plan).await;
        let bookings = BookingService::new(
            repos.clone(),
            SlotLockService::new(repos.clone()),
            BookingPolicy::default(),
        );
        let booking = bookings
            .create_booking(
                &driver.id,
                subscription.id,
                station.id,
                Utc::now() + chrono::Duration::hours(1),
            )
            .await
            .unwrap();

        let err = svc.delete_user(&driver.id, "admin-1").await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(
            repos
                .slots()
                .count_by_status(station.id, SlotStatus::Lock)
                .await
                .unwrap(),
            2
        );

        let owner = Actor::new(driver.id.clone(), UserRole::Driver);
        bookings.cancel(booking.appointment.id, &owner).await.unwrap();
        svc.delete_user(&driver.id, "admin-1").await.unwrap();
        assert_eq!(
            repos
                .slots()
                .count_by_status(station.id, SlotStatus::Lock)
                .await
                .unwrap(),
            0
        );
    }
}
