//! SeaORM implementation of SubscriptionRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::domain::subscription::{Subscription, SubscriptionRepository, SubscriptionStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::subscription;
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmSubscriptionRepository {
    db: DatabaseConnection,
}

impl SeaOrmSubscriptionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: subscription::Model) -> Subscription {
    Subscription {
        id: m.id,
        user_id: m.user_id,
        plan_id: m.plan_id,
        status: SubscriptionStatus::from(m.status.as_str()),
        start_date: m.start_date,
        end_date: m.end_date,
        remaining_swaps: m.remaining_swaps,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

#[async_trait]
impl SubscriptionRepository for SeaOrmSubscriptionRepository {
    async fn create(&self, s: Subscription) -> DomainResult<Subscription> {
        debug!("Creating subscription for user {} plan {}", s.user_id, s.plan_id);
        let model = subscription::ActiveModel {
            id: NotSet,
            user_id: Set(s.user_id),
            plan_id: Set(s.plan_id),
            status: Set(s.status.as_str().to_string()),
            start_date: Set(s.start_date),
            end_date: Set(s.end_date),
            remaining_swaps: Set(s.remaining_swaps),
            created_at: Set(s.created_at),
            updated_at: Set(s.updated_at),
        }
        .insert(&self.db)
        .await?;
        Ok(model_to_domain(model))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Subscription>> {
        let model = subscription::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn list_by_user(&self, user_id: &str) -> DomainResult<Vec<Subscription>> {
        let models = subscription::Entity::find()
            .filter(subscription::Column::UserId.eq(user_id))
            .order_by_desc(subscription::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn list(
        &self,
        status: Option<SubscriptionStatus>,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<Subscription>> {
        let mut query = subscription::Entity::find();
        if let Some(status) = status {
            query = query.filter(subscription::Column::Status.eq(status.as_str()));
        }

        let total = query.clone().count(&self.db).await?;
        let models = query
            .order_by_desc(subscription::Column::CreatedAt)
            .offset(pagination.offset())
            .limit(pagination.limit as u64)
            .all(&self.db)
            .await?;

        Ok(PaginatedResult::new(
            models.into_iter().map(model_to_domain).collect(),
            total,
            pagination.page,
            pagination.limit,
        ))
    }

    async fn count_by_plan(&self, plan_id: i32) -> DomainResult<u64> {
        Ok(subscription::Entity::find()
            .filter(subscription::Column::PlanId.eq(plan_id))
            .count(&self.db)
            .await?)
    }

    async fn find_ended(&self, now: DateTime<Utc>) -> DomainResult<Vec<Subscription>> {
        let models = subscription::Entity::find()
            .filter(subscription::Column::Status.eq(SubscriptionStatus::Active.as_str()))
            .filter(subscription::Column::EndDate.lt(now))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, s: Subscription) -> DomainResult<Subscription> {
        debug!("Updating subscription {} -> {}", s.id, s.status);
        let Some(existing) = subscription::Entity::find_by_id(s.id).one(&self.db).await? else {
            return Err(DomainError::not_found("Subscription", "id", s.id));
        };

        let mut active: subscription::ActiveModel = existing.into();
        active.status = Set(s.status.as_str().to_string());
        active.start_date = Set(s.start_date);
        active.end_date = Set(s.end_date);
        active.remaining_swaps = Set(s.remaining_swaps);
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;
        Ok(model_to_domain(model))
    }
}
