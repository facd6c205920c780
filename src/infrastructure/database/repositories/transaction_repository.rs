//! SeaORM implementation of TransactionRepository

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::domain::transaction::{Transaction, TransactionRepository, TransactionStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::transaction;
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmTransactionRepository {
    db: DatabaseConnection,
}

impl SeaOrmTransactionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: transaction::Model) -> Transaction {
    Transaction {
        id: m.id,
        user_id: m.user_id,
        subscription_id: m.subscription_id,
        plan_id: m.plan_id,
        amount: m.amount,
        currency: m.currency,
        status: TransactionStatus::from(m.status.as_str()),
        gateway_response_code: m.gateway_response_code,
        gateway_transaction_no: m.gateway_transaction_no,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

#[async_trait]
impl TransactionRepository for SeaOrmTransactionRepository {
    async fn create(&self, t: Transaction) -> DomainResult<Transaction> {
        debug!("Creating transaction {} amount {}", t.id, t.amount);
        let model = transaction::ActiveModel {
            id: Set(t.id),
            user_id: Set(t.user_id),
            subscription_id: Set(t.subscription_id),
            plan_id: Set(t.plan_id),
            amount: Set(t.amount),
            currency: Set(t.currency),
            status: Set(t.status.as_str().to_string()),
            gateway_response_code: Set(t.gateway_response_code),
            gateway_transaction_no: Set(t.gateway_transaction_no),
            created_at: Set(t.created_at),
            updated_at: Set(t.updated_at),
        }
        .insert(&self.db)
        .await?;
        Ok(model_to_domain(model))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Transaction>> {
        let model = transaction::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn list(
        &self,
        user_id: Option<&str>,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<Transaction>> {
        let mut query = transaction::Entity::find();
        if let Some(user_id) = user_id {
            query = query.filter(transaction::Column::UserId.eq(user_id));
        }

        let total = query.clone().count(&self.db).await?;
        let models = query
            .order_by_desc(transaction::Column::CreatedAt)
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

    async fn update(&self, t: Transaction) -> DomainResult<Transaction> {
        debug!("Updating transaction {} -> {}", t.id, t.status);
        let Some(existing) = transaction::Entity::find_by_id(t.id.as_str())
            .one(&self.db)
            .await?
        else {
            return Err(DomainError::not_found("Transaction", "id", &t.id));
        };

        let mut active: transaction::ActiveModel = existing.into();
        active.status = Set(t.status.as_str().to_string());
        active.gateway_response_code = Set(t.gateway_response_code);
        active.gateway_transaction_no = Set(t.gateway_transaction_no);
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;
        Ok(model_to_domain(model))
    }
}
