//! Station, pillar and slot DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{Pillar, PillarSlot, SlotAvailability, SlotStatus, Station};
use crate::interfaces::http::common::{parse_enum, ApiError};

const SLOT_STATUSES: [(&str, SlotStatus); 4] = [
    ("Available", SlotStatus::Available),
    ("Unavailable", SlotStatus::Unavailable),
    ("Lock", SlotStatus::Lock),
    ("Use", SlotStatus::Use),
];

pub(crate) fn parse_slot_status(value: &str) -> Result<SlotStatus, ApiError> {
    parse_enum(value, &SLOT_STATUSES)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StationDto {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Station> for StationDto {
    fn from(s: Station) -> Self {
        Self {
            id: s.id,
            name: s.name,
            address: s.address,
            latitude: s.latitude,
            longitude: s.longitude,
            is_active: s.is_active,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "District 1 Hub",
    "address": "12 Nguyen Hue, Ho Chi Minh City",
    "latitude": 10.7769,
    "longitude": 106.7009
}))]
pub struct CreateStationRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub address: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStationRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListStationsParams {
    /// Match against name or address
    pub search: Option<String>,
    /// Include deactivated stations
    #[serde(default)]
    pub include_inactive: bool,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PillarDto {
    pub id: i32,
    pub station_id: i32,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

impl From<Pillar> for PillarDto {
    fn from(p: Pillar) -> Self {
        Self {
            id: p.id,
            station_id: p.station_id,
            code: p.code,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePillarRequest {
    #[validate(length(min = 1, max = 20))]
    pub code: String,
    /// Number of empty slots to create, numbered from 1
    #[validate(range(min = 1, max = 50))]
    pub slot_count: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PillarWithSlotsDto {
    pub pillar: PillarDto,
    pub slots: Vec<SlotDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SlotDto {
    pub id: i32,
    pub pillar_id: i32,
    pub station_id: i32,
    pub slot_number: i32,
    /// `Available`, `Unavailable`, `Lock` or `Use`
    pub status: String,
    pub battery_id: Option<String>,
    pub appointment_id: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl From<PillarSlot> for SlotDto {
    fn from(s: PillarSlot) -> Self {
        Self {
            id: s.id,
            pillar_id: s.pillar_id,
            station_id: s.station_id,
            slot_number: s.slot_number,
            status: s.status.to_string(),
            battery_id: s.battery_id,
            appointment_id: s.appointment_id,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SlotFilterParams {
    /// Only slots in this status
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityDto {
    pub station_id: i32,
    /// Empty bays
    pub empty: u64,
    /// Ready batteries that can be booked
    pub ready: u64,
    pub locked: u64,
    pub charging: u64,
    pub total: u64,
}

impl From<SlotAvailability> for AvailabilityDto {
    fn from(a: SlotAvailability) -> Self {
        Self {
            total: a.total(),
            station_id: a.station_id,
            empty: a.empty,
            ready: a.ready,
            locked: a.locked,
            charging: a.charging,
        }
    }
}
