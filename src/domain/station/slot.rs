//! Pillar slot entity and its status machine
//!
//! ```text
//!   Available ──place battery──▶ Unavailable ──lock──▶ Lock
//!       ▲                            ▲                  │
//!       │                            └─────unlock───────┤
//!       └──── swap, nothing returned ◀──────────────────┤
//!   Use ◀──── swap, battery returned ◀──────────────────┘
//!    └───────── battery charged ──────▶ Unavailable
//! ```

use chrono::{DateTime, Utc};

/// Slot status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    /// Empty bay, can receive a battery
    Available,
    /// Holds a ready battery; candidate for locking
    Unavailable,
    /// Reserved for an appointment
    Lock,
    /// Holds a returned battery that is charging
    Use,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Unavailable => "Unavailable",
            Self::Lock => "Lock",
            Self::Use => "Use",
        }
    }
}

impl From<&str> for SlotStatus {
    fn from(s: &str) -> Self {
        match s {
            "Available" => Self::Available,
            "Unavailable" => Self::Unavailable,
            "Lock" => Self::Lock,
            "Use" => Self::Use,
            // Unknown values are treated as not bookable.
            _ => Self::Use,
        }
    }
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A physical bay holding at most one battery
#[derive(Debug, Clone)]
pub struct PillarSlot {
    pub id: i32,
    pub pillar_id: i32,
    pub station_id: i32,
    pub slot_number: i32,
    pub status: SlotStatus,
    pub battery_id: Option<String>,
    /// Set only while `status == Lock`
    pub appointment_id: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl PillarSlot {
    /// New empty slot
    pub fn new(pillar_id: i32, station_id: i32, slot_number: i32) -> Self {
        Self {
            id: 0,
            pillar_id,
            station_id,
            slot_number,
            status: SlotStatus::Available,
            battery_id: None,
            appointment_id: None,
            updated_at: Utc::now(),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.status == SlotStatus::Lock
    }

    /// Put a battery into an empty slot. `charging` decides between
    /// `Use` (charging) and `Unavailable` (ready to hand out).
    pub fn place_battery(&mut self, battery_id: impl Into<String>, charging: bool) {
        self.battery_id = Some(battery_id.into());
        self.status = if charging {
            SlotStatus::Use
        } else {
            SlotStatus::Unavailable
        };
        self.appointment_id = None;
        self.updated_at = Utc::now();
    }

    /// Take the battery out; the slot becomes empty. Returns the removed battery.
    pub fn take_battery(&mut self) -> Option<String> {
        let battery = self.battery_id.take();
        self.status = SlotStatus::Available;
        self.appointment_id = None;
        self.updated_at = Utc::now();
        battery
    }
}

/// Per-status slot counts for one station
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotAvailability {
    pub station_id: i32,
    pub empty: u64,
    pub ready: u64,
    pub locked: u64,
    pub charging: u64,
}

impl SlotAvailability {
    pub fn total(&self) -> u64 {
        self.empty + self.ready + self.locked + self.charging
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrip() {
        for status in [
            SlotStatus::Available,
            SlotStatus::Unavailable,
            SlotStatus::Lock,
            SlotStatus::Use,
        ] {
            assert_eq!(SlotStatus::from(status.as_str()), status);
        }
    }

    #[test]
    fn unknown_status_is_not_bookable() {
        assert_eq!(SlotStatus::from("Broken"), SlotStatus::Use);
    }

    #[test]
    fn place_and_take_battery() {
        let mut slot = PillarSlot::new(1, 1, 3);
        assert_eq!(slot.status, SlotStatus::Available);

        slot.place_battery("BAT-1", false);
        assert_eq!(slot.status, SlotStatus::Unavailable);
        assert_eq!(slot.battery_id.as_deref(), Some("BAT-1"));

        assert_eq!(slot.take_battery().as_deref(), Some("BAT-1"));
        assert_eq!(slot.status, SlotStatus::Available);
        assert!(slot.battery_id.is_none());
    }

    #[test]
    fn placing_clears_appointment_link() {
        let mut slot = PillarSlot::new(1, 1, 1);
        slot.status = SlotStatus::Lock;
        slot.appointment_id = Some(9);
        slot.place_battery("BAT-2", true);
        assert_eq!(slot.status, SlotStatus::Use);
        assert!(slot.appointment_id.is_none());
    }
}
