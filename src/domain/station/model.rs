//! Station and pillar entities

use chrono::{DateTime, Utc};

use crate::shared::PaginationParams;

/// Battery-swap station
#[derive(Debug, Clone)]
pub struct Station {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Station {
    /// New, not yet persisted station (id is assigned by the database)
    pub fn new(name: impl Into<String>, address: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: name.into(),
            address: address.into(),
            latitude,
            longitude,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A cluster of slots inside a station
#[derive(Debug, Clone)]
pub struct Pillar {
    pub id: i32,
    pub station_id: i32,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

impl Pillar {
    pub fn new(station_id: i32, code: impl Into<String>) -> Self {
        Self {
            id: 0,
            station_id,
            code: code.into(),
            created_at: Utc::now(),
        }
    }
}

/// Filters for listing stations
#[derive(Debug, Clone, Default)]
pub struct StationQuery {
    /// Substring match on name or address
    pub search: Option<String>,
    pub active_only: bool,
    pub pagination: PaginationParams,
}
