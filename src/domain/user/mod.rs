//! User aggregate
//!
//! Contains the User entity, list query, and repository interface.

pub mod model;
pub mod repository;

pub use model::{User, UserQuery, UserRole};
pub use repository::UserRepository;
