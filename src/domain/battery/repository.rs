use async_trait::async_trait;

use super::{Battery, BatteryQuery};
use crate::shared::{DomainResult, PaginatedResult};

#[async_trait]
pub trait BatteryRepository: Send + Sync {
    async fn create(&self, battery: Battery) -> DomainResult<Battery>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Battery>>;
    async fn list(&self, query: BatteryQuery) -> DomainResult<PaginatedResult<Battery>>;
    async fn update(&self, battery: Battery) -> DomainResult<Battery>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
