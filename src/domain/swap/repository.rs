use async_trait::async_trait;

use super::{BatterySwap, SwapQuery};
use crate::shared::{DomainResult, PaginatedResult};

#[async_trait]
pub trait BatterySwapRepository: Send + Sync {
    async fn create(&self, swap: BatterySwap) -> DomainResult<BatterySwap>;
    async fn list(&self, query: SwapQuery) -> DomainResult<PaginatedResult<BatterySwap>>;
}
