//! Battery domain entity

use chrono::{DateTime, Utc};

use crate::shared::PaginationParams;

/// Battery lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryStatus {
    /// Charged and ready to hand out
    Ready,
    /// Charging in a slot
    Charging,
    /// Installed in a driver's vehicle
    InUse,
    Maintenance,
    Retired,
}

impl BatteryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Charging => "Charging",
            Self::InUse => "InUse",
            Self::Maintenance => "Maintenance",
            Self::Retired => "Retired",
        }
    }
}

impl From<&str> for BatteryStatus {
    fn from(s: &str) -> Self {
        match s {
            "Ready" => Self::Ready,
            "Charging" => Self::Charging,
            "InUse" => Self::InUse,
            "Retired" => Self::Retired,
            _ => Self::Maintenance,
        }
    }
}

impl std::fmt::Display for BatteryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Swappable battery pack
#[derive(Debug, Clone)]
pub struct Battery {
    /// Serial number
    pub id: String,
    pub model: String,
    pub capacity_kwh: f64,
    /// State of charge, percent
    pub state_of_charge: i32,
    /// State of health, percent
    pub state_of_health: i32,
    pub status: BatteryStatus,
    /// Station currently holding the battery (None while in a vehicle)
    pub station_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Battery {
    pub fn new(id: impl Into<String>, model: impl Into<String>, capacity_kwh: f64) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            model: model.into(),
            capacity_kwh,
            state_of_charge: 100,
            state_of_health: 100,
            status: BatteryStatus::Ready,
            station_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Can this battery be put into a station slot?
    pub fn is_placeable(&self) -> bool {
        !matches!(self.status, BatteryStatus::Retired | BatteryStatus::Maintenance)
    }

    /// Handed out to a driver during a swap
    pub fn hand_out(&mut self) {
        self.status = BatteryStatus::InUse;
        self.station_id = None;
        self.updated_at = Utc::now();
    }

    /// Returned by a driver and put on charge at a station
    pub fn return_to(&mut self, station_id: i32) {
        self.status = BatteryStatus::Charging;
        self.station_id = Some(station_id);
        self.updated_at = Utc::now();
    }
}

/// Filters for listing batteries
#[derive(Debug, Clone, Default)]
pub struct BatteryQuery {
    pub station_id: Option<i32>,
    pub status: Option<BatteryStatus>,
    pub pagination: PaginationParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hand_out_and_return() {
        let mut b = Battery::new("BAT-001", "LFP-48V", 2.4);
        b.station_id = Some(1);
        b.hand_out();
        assert_eq!(b.status, BatteryStatus::InUse);
        assert!(b.station_id.is_none());

        b.return_to(2);
        assert_eq!(b.status, BatteryStatus::Charging);
        assert_eq!(b.station_id, Some(2));
    }

    #[test]
    fn retired_and_maintenance_are_not_placeable() {
        let mut b = Battery::new("BAT-002", "LFP-48V", 2.4);
        assert!(b.is_placeable());
        b.status = BatteryStatus::Retired;
        assert!(!b.is_placeable());
        b.status = BatteryStatus::Maintenance;
        assert!(!b.is_placeable());
    }
}
