//! Stations with their pillars, slots and availability

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
