//! Swap bookings and the slots they hold

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
