use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{Subscription, SubscriptionStatus};
use crate::shared::{DomainResult, PaginatedResult, PaginationParams};

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn create(&self, subscription: Subscription) -> DomainResult<Subscription>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Subscription>>;
    async fn list_by_user(&self, user_id: &str) -> DomainResult<Vec<Subscription>>;
    async fn list(
        &self,
        status: Option<SubscriptionStatus>,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<Subscription>>;
    async fn count_by_plan(&self, plan_id: i32) -> DomainResult<u64>;

    /// Active subscriptions whose `end_date` is before `now`
    async fn find_ended(&self, now: DateTime<Utc>) -> DomainResult<Vec<Subscription>>;

    async fn update(&self, subscription: Subscription) -> DomainResult<Subscription>;
}
