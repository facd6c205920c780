//! Payment DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::CheckoutResult;
use crate::domain::Transaction;
use crate::interfaces::http::modules::subscriptions::SubscriptionDto;

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionDto {
    /// Also the gateway `txn_ref`
    pub id: String,
    pub user_id: String,
    pub subscription_id: i32,
    pub plan_id: i32,
    /// Minor currency units
    pub amount: i64,
    pub currency: String,
    /// `Pending`, `Success` or `Failed`
    pub status: String,
    pub gateway_response_code: Option<String>,
    pub gateway_transaction_no: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionDto {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            user_id: t.user_id,
            subscription_id: t.subscription_id,
            plan_id: t.plan_id,
            amount: t.amount,
            currency: t.currency,
            status: t.status.to_string(),
            gateway_response_code: t.gateway_response_code,
            gateway_transaction_no: t.gateway_transaction_no,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"plan_id": 2}))]
pub struct CheckoutRequest {
    #[validate(range(min = 1))]
    pub plan_id: i32,
}

/// Redirect the driver's browser to `payment_url` to pay
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub payment_url: String,
    pub transaction: TransactionDto,
    pub subscription: SubscriptionDto,
}

impl From<CheckoutResult> for CheckoutResponse {
    fn from(r: CheckoutResult) -> Self {
        Self {
            payment_url: r.payment_url,
            transaction: r.transaction.into(),
            subscription: r.subscription.into(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListTransactionsParams {
    /// Admin only filter
    pub user_id: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
