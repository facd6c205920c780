//! Inventory: stations, pillars, slots and batteries

pub mod batteries;
pub mod stations;

pub use batteries::{BatteryChanges, BatteryService};
pub use stations::{StationChanges, StationService};
