//! Subscription DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Subscription, SubscriptionStatus};
use crate::interfaces::http::common::{parse_enum, ApiError};

const SUBSCRIPTION_STATUSES: [(&str, SubscriptionStatus); 4] = [
    ("Pending", SubscriptionStatus::Pending),
    ("Active", SubscriptionStatus::Active),
    ("Expired", SubscriptionStatus::Expired),
    ("Cancelled", SubscriptionStatus::Cancelled),
];

pub(crate) fn parse_subscription_status(value: &str) -> Result<SubscriptionStatus, ApiError> {
    parse_enum(value, &SUBSCRIPTION_STATUSES)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriptionDto {
    pub id: i32,
    pub user_id: String,
    pub plan_id: i32,
    /// `Pending` until paid, then `Active`, finally `Expired` or `Cancelled`
    pub status: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub remaining_swaps: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Subscription> for SubscriptionDto {
    fn from(s: Subscription) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            plan_id: s.plan_id,
            status: s.status.to_string(),
            start_date: s.start_date,
            end_date: s.end_date,
            remaining_swaps: s.remaining_swaps,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListSubscriptionsParams {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
