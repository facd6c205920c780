//! Database entities module

pub mod appointment;
pub mod battery;
pub mod battery_swap;
pub mod pillar;
pub mod pillar_slot;
pub mod plan;
pub mod station;
pub mod subscription;
pub mod transaction;
pub mod user;

pub use appointment::Entity as Appointment;
pub use battery::Entity as Battery;
pub use battery_swap::Entity as BatterySwap;
pub use pillar::Entity as Pillar;
pub use pillar_slot::Entity as PillarSlot;
pub use plan::Entity as Plan;
pub use station::Entity as Station;
pub use subscription::Entity as Subscription;
pub use transaction::Entity as Transaction;
pub use user::Entity as User;
