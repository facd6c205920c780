//! Battery swap DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::BatterySwap;

#[derive(Debug, Serialize, ToSchema)]
pub struct BatterySwapDto {
    pub id: i32,
    pub appointment_id: i32,
    pub station_id: i32,
    pub user_id: String,
    pub slot_id: i32,
    /// Battery handed to the driver
    pub battery_out_id: String,
    /// Battery the driver brought back into the same slot
    pub battery_in_id: Option<String>,
    pub swapped_at: DateTime<Utc>,
}

impl From<BatterySwap> for BatterySwapDto {
    fn from(s: BatterySwap) -> Self {
        Self {
            id: s.id,
            appointment_id: s.appointment_id,
            station_id: s.station_id,
            user_id: s.user_id,
            slot_id: s.slot_id,
            battery_out_id: s.battery_out_id,
            battery_in_id: s.battery_in_id,
            swapped_at: s.swapped_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"appointment_id": 12, "returned_battery_ids": ["BAT-0007", "BAT-0019"]}))]
pub struct CompleteSwapRequest {
    #[validate(range(min = 1))]
    pub appointment_id: i32,
    /// Batteries the driver hands back, at most one per locked slot
    #[serde(default)]
    #[validate(length(max = 10))]
    pub returned_battery_ids: Vec<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListSwapsParams {
    /// Staff only; drivers always see their own swaps
    pub user_id: Option<String>,
    pub station_id: Option<i32>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
