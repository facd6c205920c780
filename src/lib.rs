//! # EV Battery-Swap Service
//!
//! Back-office service for a battery-swap network: accounts, stations with
//! pillars and slots, the battery registry, subscription plans, bookings
//! that lock ready batteries, completed swaps and gateway payments.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Entities, status machines and repository traits
//! - **application**: Use-case services and the booking expiry task
//! - **infrastructure**: SeaORM persistence and crypto (JWT, bcrypt, signatures)
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: Errors, pagination, graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::repositories::SeaOrmRepositoryProvider;
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::create_api_router;
