//! Plans, subscriptions and payments

pub mod payments;
pub mod plans;
pub mod subscriptions;

pub use payments::{CheckoutResult, PaymentGatewayConfig, PaymentService};
pub use plans::{PlanChanges, PlanService};
pub use subscriptions::SubscriptionService;
