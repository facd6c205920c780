use async_trait::async_trait;

use super::Transaction;
use crate::shared::{DomainResult, PaginatedResult, PaginationParams};

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn create(&self, transaction: Transaction) -> DomainResult<Transaction>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Transaction>>;
    async fn list(
        &self,
        user_id: Option<&str>,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<Transaction>>;
    async fn update(&self, transaction: Transaction) -> DomainResult<Transaction>;
}
