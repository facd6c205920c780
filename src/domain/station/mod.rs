//! Station aggregate
//!
//! A station groups pillars; each pillar is a cluster of slots, and each
//! slot is a physical bay holding at most one battery.

pub mod model;
pub mod repository;
pub mod slot;

pub use model::{Pillar, Station, StationQuery};
pub use repository::{PillarRepository, PillarSlotRepository, StationRepository};
pub use slot::{PillarSlot, SlotAvailability, SlotStatus};
