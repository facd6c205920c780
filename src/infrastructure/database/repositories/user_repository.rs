//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::domain::user::{User, UserQuery, UserRepository, UserRole};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::user;
use crate::shared::PaginatedResult;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Admin => UserRole::Admin,
        user::UserRole::Staff => UserRole::Staff,
        user::UserRole::Driver => UserRole::Driver,
    }
}

fn domain_role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::Admin => user::UserRole::Admin,
        UserRole::Staff => user::UserRole::Staff,
        UserRole::Driver => user::UserRole::Driver,
    }
}

fn model_to_domain(m: user::Model) -> User {
    User {
        id: m.id,
        username: m.username,
        email: m.email,
        phone: m.phone,
        password_hash: m.password_hash,
        role: entity_role_to_domain(m.role),
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
        last_login_at: m.last_login_at,
    }
}

fn domain_to_active(u: User) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(u.id),
        username: Set(u.username),
        email: Set(u.email),
        phone: Set(u.phone),
        password_hash: Set(u.password_hash),
        role: Set(domain_role_to_entity(u.role)),
        is_active: Set(u.is_active),
        created_at: Set(u.created_at),
        updated_at: Set(u.updated_at),
        last_login_at: Set(u.last_login_at),
    }
}

fn unique_violation(e: sea_orm::DbErr) -> DomainError {
    let msg = e.to_string();
    if msg.contains("UNIQUE") || msg.contains("duplicate") {
        DomainError::Conflict("Username or email already exists".to_string())
    } else {
        DomainError::Database(msg)
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, u: User) -> DomainResult<User> {
        debug!("Creating user: {}", u.username);
        let model = domain_to_active(u)
            .insert(&self.db)
            .await
            .map_err(unique_violation)?;
        Ok(model_to_domain(model))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_domain))
    }

    async fn list(&self, q: UserQuery) -> DomainResult<PaginatedResult<User>> {
        let mut query = user::Entity::find();

        if let Some(ref search) = q.search {
            query = query.filter(
                Condition::any()
                    .add(user::Column::Username.contains(search))
                    .add(user::Column::Email.contains(search)),
            );
        }
        if let Some(role) = q.role {
            query = query.filter(user::Column::Role.eq(domain_role_to_entity(role)));
        }

        let total = query.clone().count(&self.db).await?;
        let models = query
            .order_by_desc(user::Column::CreatedAt)
            .offset(q.pagination.offset())
            .limit(q.pagination.limit as u64)
            .all(&self.db)
            .await?;

        Ok(PaginatedResult::new(
            models.into_iter().map(model_to_domain).collect(),
            total,
            q.pagination.page,
            q.pagination.limit,
        ))
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }

    async fn update(&self, u: User) -> DomainResult<User> {
        debug!("Updating user: {}", u.id);
        if user::Entity::find_by_id(u.id.as_str())
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(DomainError::not_found("User", "id", &u.id));
        }
        let mut active = domain_to_active(u);
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await.map_err(unique_violation)?;
        Ok(model_to_domain(model))
    }

    async fn touch_last_login(&self, id: &str) -> DomainResult<()> {
        let Some(existing) = user::Entity::find_by_id(id).one(&self.db).await? else {
            return Err(DomainError::not_found("User", "id", id));
        };
        let mut active: user::ActiveModel = existing.into();
        active.last_login_at = Set(Some(Utc::now()));
        active.update(&self.db).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        debug!("Deleting user: {}", id);
        let result = user::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("User", "id", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_connection;
    use crate::shared::PaginationParams;

    #[tokio::test]
    async fn duplicate_username_is_conflict() {
        let repo = SeaOrmUserRepository::new(test_connection().await);
        repo.create(User::new("alice", "a@x.io", "hash", UserRole::Driver))
            .await
            .unwrap();

        let err = repo
            .create(User::new("alice", "other@x.io", "hash", UserRole::Driver))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn list_filters_by_role_and_search() {
        let repo = SeaOrmUserRepository::new(test_connection().await);
        repo.create(User::new("alice", "alice@x.io", "h", UserRole::Driver))
            .await
            .unwrap();
        repo.create(User::new("bob", "bob@x.io", "h", UserRole::Staff))
            .await
            .unwrap();

        let staff = repo
            .list(UserQuery {
                role: Some(UserRole::Staff),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(staff.total, 1);
        assert_eq!(staff.items[0].username, "bob");

        let search = repo
            .list(UserQuery {
                search: Some("ali".into()),
                pagination: PaginationParams::new(Some(1), Some(10)),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(search.items.len(), 1);
        assert_eq!(search.items[0].role, UserRole::Driver);
    }

    #[tokio::test]
    async fn touch_last_login_sets_timestamp() {
        let repo = SeaOrmUserRepository::new(test_connection().await);
        let user = repo
            .create(User::new("carol", "c@x.io", "h", UserRole::Admin))
            .await
            .unwrap();
        assert!(user.last_login_at.is_none());

        repo.touch_last_login(&user.id).await.unwrap();
        let reloaded = repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert!(reloaded.last_login_at.is_some());
    }
}
