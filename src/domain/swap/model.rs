use chrono::{DateTime, Utc};

use crate::shared::PaginationParams;

/// One battery handed out during a completed appointment
#[derive(Debug, Clone)]
pub struct BatterySwap {
    pub id: i32,
    pub appointment_id: i32,
    pub station_id: i32,
    pub user_id: String,
    pub slot_id: i32,
    pub battery_out_id: String,
    /// Battery the driver returned into the same slot, if any
    pub battery_in_id: Option<String>,
    pub swapped_at: DateTime<Utc>,
}

/// Filters for listing swaps
#[derive(Debug, Clone, Default)]
pub struct SwapQuery {
    pub user_id: Option<String>,
    pub station_id: Option<i32>,
    pub pagination: PaginationParams,
}
