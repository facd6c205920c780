//! Plan checkout, gateway callback and transaction history

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
