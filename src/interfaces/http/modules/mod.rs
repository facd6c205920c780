pub mod auth;
pub mod batteries;
pub mod battery_swaps;
pub mod bookings;
pub mod health;
pub mod metrics;
pub mod payments;
pub mod plans;
pub mod request_id;
pub mod slots;
pub mod stations;
pub mod subscriptions;
pub mod users;
