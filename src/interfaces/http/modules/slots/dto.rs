//! Slot operation DTOs

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// `battery_id` set: place that battery into the empty slot.
/// `battery_id` null or missing: take the battery out.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"battery_id": "BAT-0042"}))]
pub struct SlotBatteryRequest {
    #[validate(length(min = 1, max = 64))]
    pub battery_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"status": "Unavailable"}))]
pub struct SlotStatusRequest {
    /// `Available`, `Unavailable` or `Use`
    #[validate(length(min = 1))]
    pub status: String,
}
