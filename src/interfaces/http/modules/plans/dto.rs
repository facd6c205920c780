//! Plan DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::Plan;

#[derive(Debug, Serialize, ToSchema)]
pub struct PlanDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Minor currency units
    pub price: i64,
    pub currency: String,
    pub duration_days: i32,
    /// Swaps included in one period
    pub swap_limit: i32,
    /// Batteries handed out per swap
    pub battery_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Plan> for PlanDto {
    fn from(p: Plan) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            currency: p.currency,
            duration_days: p.duration_days,
            swap_limit: p.swap_limit,
            battery_count: p.battery_count,
            is_active: p.is_active,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Commuter",
    "price": 350000,
    "duration_days": 30,
    "swap_limit": 20,
    "battery_count": 2
}))]
pub struct CreatePlanRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price: i64,
    /// Defaults to the configured payment currency
    #[validate(length(equal = 3))]
    pub currency: Option<String>,
    #[validate(range(min = 1, max = 3650))]
    pub duration_days: i32,
    #[validate(range(min = 1))]
    pub swap_limit: i32,
    #[validate(range(min = 1, max = 10))]
    pub battery_count: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePlanRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price: Option<i64>,
    #[validate(length(equal = 3))]
    pub currency: Option<String>,
    #[validate(range(min = 1, max = 3650))]
    pub duration_days: Option<i32>,
    #[validate(range(min = 1))]
    pub swap_limit: Option<i32>,
    #[validate(range(min = 1, max = 10))]
    pub battery_count: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListPlansParams {
    /// Include plans withdrawn from sale
    #[serde(default)]
    pub include_inactive: bool,
}
