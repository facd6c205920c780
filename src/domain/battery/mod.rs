//! Battery aggregate

pub mod model;
pub mod repository;

pub use model::{Battery, BatteryQuery, BatteryStatus};
pub use repository::BatteryRepository;
