//! Battery swap history

pub mod model;
pub mod repository;

pub use model::{BatterySwap, SwapQuery};
pub use repository::BatterySwapRepository;
