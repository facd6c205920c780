//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod appointment_repository;
pub mod battery_repository;
pub mod plan_repository;
pub mod repository_provider;
pub mod slot_repository;
pub mod station_repository;
pub mod subscription_repository;
pub mod swap_repository;
pub mod transaction_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;
