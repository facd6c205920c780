//! Staff operations on individual slots

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
