//! Completing booked swaps and the swap history

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
