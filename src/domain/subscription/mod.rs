//! Subscription aggregate

pub mod model;
pub mod repository;

pub use model::{Subscription, SubscriptionStatus};
pub use repository::SubscriptionRepository;
