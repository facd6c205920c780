//! Battery DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{Battery, BatteryStatus};
use crate::interfaces::http::common::{parse_enum, ApiError};

const BATTERY_STATUSES: [(&str, BatteryStatus); 5] = [
    ("Ready", BatteryStatus::Ready),
    ("Charging", BatteryStatus::Charging),
    ("InUse", BatteryStatus::InUse),
    ("Maintenance", BatteryStatus::Maintenance),
    ("Retired", BatteryStatus::Retired),
];

pub(crate) fn parse_battery_status(value: &str) -> Result<BatteryStatus, ApiError> {
    parse_enum(value, &BATTERY_STATUSES)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatteryDto {
    /// Serial number
    pub id: String,
    pub model: String,
    pub capacity_kwh: f64,
    /// Percent, 0-100
    pub state_of_charge: i32,
    /// Percent, 0-100
    pub state_of_health: i32,
    pub status: String,
    /// Station currently holding the battery; `null` while with a driver
    pub station_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Battery> for BatteryDto {
    fn from(b: Battery) -> Self {
        Self {
            id: b.id,
            model: b.model,
            capacity_kwh: b.capacity_kwh,
            state_of_charge: b.state_of_charge,
            state_of_health: b.state_of_health,
            status: b.status.to_string(),
            station_id: b.station_id,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"id": "BAT-0042", "model": "LFP-48V", "capacity_kwh": 2.4}))]
pub struct CreateBatteryRequest {
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    #[validate(length(min = 1, max = 100))]
    pub model: String,
    pub capacity_kwh: f64,
    #[validate(range(min = 0, max = 100))]
    pub state_of_charge: Option<i32>,
    #[validate(range(min = 0, max = 100))]
    pub state_of_health: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBatteryRequest {
    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,
    pub capacity_kwh: Option<f64>,
    #[validate(range(min = 0, max = 100))]
    pub state_of_charge: Option<i32>,
    #[validate(range(min = 0, max = 100))]
    pub state_of_health: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListBatteriesParams {
    pub station_id: Option<i32>,
    /// Ready, Charging, InUse, Maintenance or Retired
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
