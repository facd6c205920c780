//! Subscription plan catalogue

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::{DomainError, DomainResult, Plan, RepositoryProvider};

/// Editable plan fields; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct PlanChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub currency: Option<String>,
    pub duration_days: Option<i32>,
    pub swap_limit: Option<i32>,
    pub battery_count: Option<i32>,
    pub is_active: Option<bool>,
}

pub struct PlanService {
    repos: Arc<dyn RepositoryProvider>,
}

impl PlanService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn create(&self, plan: Plan) -> DomainResult<Plan> {
        plan.validate().map_err(DomainError::Validation)?;
        let plan = self.repos.plans().create(plan).await?;
        info!(plan_id = plan.id, name = %plan.name, price = plan.price, "Plan created");
        Ok(plan)
    }

    pub async fn get(&self, id: i32) -> DomainResult<Plan> {
        self.repos
            .plans()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Plan", "id", id))
    }

    pub async fn list(&self, active_only: bool) -> DomainResult<Vec<Plan>> {
        self.repos.plans().list(active_only).await
    }

    pub async fn update(&self, id: i32, changes: PlanChanges) -> DomainResult<Plan> {
        let mut plan = self.get(id).await?;
        if let Some(name) = changes.name {
            plan.name = name;
        }
        if let Some(description) = changes.description {
            plan.description = Some(description);
        }
        if let Some(price) = changes.price {
            plan.price = price;
        }
        if let Some(currency) = changes.currency {
            plan.currency = currency;
        }
        if let Some(duration_days) = changes.duration_days {
            plan.duration_days = duration_days;
        }
        if let Some(swap_limit) = changes.swap_limit {
            plan.swap_limit = swap_limit;
        }
        if let Some(battery_count) = changes.battery_count {
            plan.battery_count = battery_count;
        }
        if let Some(is_active) = changes.is_active {
            plan.is_active = is_active;
        }
        plan.validate().map_err(DomainError::Validation)?;
        plan.updated_at = Utc::now();
        self.repos.plans().update(plan).await
    }

    /// Delete a plan nobody ever subscribed to. Deactivate it otherwise.
    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        self.get(id).await?;
        let used = self.repos.subscriptions().count_by_plan(id).await?;
        if used > 0 {
            return Err(DomainError::Conflict(format!(
                "Plan {} has {} subscriptions; deactivate it instead",
                id, used
            )));
        }
        self.repos.plans().delete(id).await?;
        info!(plan_id = id, "Plan deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::*;
    use crate::domain::UserRole;

    #[tokio::test]
    async fn invalid_plan_is_rejected() {
        let svc = PlanService::new(repos().await);
        let err = svc
            .create(Plan::new("Broken", 100, "VND", 30, 5, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn plan_in_use_cannot_be_deleted() {
        let repos = repos().await;
        let svc = PlanService::new(repos.clone());
        let user = seed_user(&repos, "driver1", UserRole::Driver).await;
        let plan = seed_plan(&repos, 1, 5).await;
        seed_active_subscription(&repos, &user.id, &plan).await;

        assert!(matches!(
            svc.delete(plan.id).await.unwrap_err(),
            DomainError::Conflict(_)
        ));

        let retired = svc
            .update(
                plan.id,
                PlanChanges {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!retired.is_active);
        assert!(svc.list(true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unused_plan_is_deleted() {
        let svc = PlanService::new(repos().await);
        let plan = svc
            .create(Plan::new("Trial", 0, "VND", 7, 2, 1))
            .await
            .unwrap();
        svc.delete(plan.id).await.unwrap();
        assert!(matches!(
            svc.get(plan.id).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }
}
