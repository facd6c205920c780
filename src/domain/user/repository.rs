use async_trait::async_trait;

use super::{User, UserQuery};
use crate::shared::{DomainResult, PaginatedResult};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> DomainResult<User>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn list(&self, query: UserQuery) -> DomainResult<PaginatedResult<User>>;
    async fn count(&self) -> DomainResult<u64>;

    async fn update(&self, user: User) -> DomainResult<User>;
    async fn touch_last_login(&self, id: &str) -> DomainResult<()>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
