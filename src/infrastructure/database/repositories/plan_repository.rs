//! SeaORM implementation of PlanRepository

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::plan::{Plan, PlanRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::plan;

pub struct SeaOrmPlanRepository {
    db: DatabaseConnection,
}

impl SeaOrmPlanRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: plan::Model) -> Plan {
    Plan {
        id: m.id,
        name: m.name,
        description: m.description,
        price: m.price,
        currency: m.currency,
        duration_days: m.duration_days,
        swap_limit: m.swap_limit,
        battery_count: m.battery_count,
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

#[async_trait]
impl PlanRepository for SeaOrmPlanRepository {
    async fn create(&self, p: Plan) -> DomainResult<Plan> {
        debug!("Creating plan: {}", p.name);
        let model = plan::ActiveModel {
            id: NotSet,
            name: Set(p.name),
            description: Set(p.description),
            price: Set(p.price),
            currency: Set(p.currency),
            duration_days: Set(p.duration_days),
            swap_limit: Set(p.swap_limit),
            battery_count: Set(p.battery_count),
            is_active: Set(p.is_active),
            created_at: Set(p.created_at),
            updated_at: Set(p.updated_at),
        }
        .insert(&self.db)
        .await?;
        Ok(model_to_domain(model))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Plan>> {
        let model = plan::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn list(&self, active_only: bool) -> DomainResult<Vec<Plan>> {
        let mut query = plan::Entity::find();
        if active_only {
            query = query.filter(plan::Column::IsActive.eq(true));
        }
        let models = query
            .order_by_asc(plan::Column::Price)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, p: Plan) -> DomainResult<Plan> {
        debug!("Updating plan: {}", p.id);
        let Some(existing) = plan::Entity::find_by_id(p.id).one(&self.db).await? else {
            return Err(DomainError::not_found("Plan", "id", p.id));
        };

        let mut active: plan::ActiveModel = existing.into();
        active.name = Set(p.name);
        active.description = Set(p.description);
        active.price = Set(p.price);
        active.currency = Set(p.currency);
        active.duration_days = Set(p.duration_days);
        active.swap_limit = Set(p.swap_limit);
        active.battery_count = Set(p.battery_count);
        active.is_active = Set(p.is_active);
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;
        Ok(model_to_domain(model))
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = plan::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Plan", "id", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_connection;

    #[tokio::test]
    async fn active_only_hides_retired_plans() {
        let repo = SeaOrmPlanRepository::new(test_connection().await);
        repo.create(Plan::new("Basic", 200_000, "VND", 30, 8, 1))
            .await
            .unwrap();
        let mut old = repo
            .create(Plan::new("Legacy", 150_000, "VND", 30, 6, 1))
            .await
            .unwrap();
        old.is_active = false;
        repo.update(old).await.unwrap();

        assert_eq!(repo.list(false).await.unwrap().len(), 2);
        let active = repo.list(true).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Basic");
    }
}
