//! Cross-cutting types shared by every layer: errors, pagination, shutdown.

pub mod errors;
pub mod pagination;
pub mod shutdown;

pub use errors::*;
pub use pagination::*;
