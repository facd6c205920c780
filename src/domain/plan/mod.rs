//! Subscription plan aggregate (plan price is the fee charged at checkout)

pub mod model;
pub mod repository;

pub use model::Plan;
pub use repository::PlanRepository;
