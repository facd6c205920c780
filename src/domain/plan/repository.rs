use async_trait::async_trait;

use super::Plan;
use crate::shared::DomainResult;

#[async_trait]
pub trait PlanRepository: Send + Sync {
    async fn create(&self, plan: Plan) -> DomainResult<Plan>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Plan>>;
    async fn list(&self, active_only: bool) -> DomainResult<Vec<Plan>>;
    async fn update(&self, plan: Plan) -> DomainResult<Plan>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
