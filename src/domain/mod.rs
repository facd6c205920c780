//! Domain layer: entities, status machines and repository interfaces.

pub mod appointment;
pub mod battery;
pub mod plan;
pub mod repositories;
pub mod station;
pub mod subscription;
pub mod swap;
pub mod transaction;
pub mod user;

pub use appointment::{Appointment, AppointmentQuery, AppointmentStatus};
pub use battery::{Battery, BatteryQuery, BatteryStatus};
pub use plan::Plan;
pub use repositories::RepositoryProvider;
pub use station::{Pillar, PillarSlot, SlotAvailability, SlotStatus, Station, StationQuery};
pub use subscription::{Subscription, SubscriptionStatus};
pub use swap::{BatterySwap, SwapQuery};
pub use transaction::{Transaction, TransactionStatus};
pub use user::{User, UserQuery, UserRole};

pub use crate::shared::{DomainError, DomainResult};
