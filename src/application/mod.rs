//! Application layer: use-case services over the domain repositories

pub mod actor;
pub mod billing;
pub mod booking;
pub mod identity;
pub mod inventory;

#[cfg(test)]
pub(crate) mod test_support;

pub use actor::Actor;
pub use billing::{
    CheckoutResult, PaymentGatewayConfig, PaymentService, PlanChanges, PlanService,
    SubscriptionService,
};
pub use booking::{
    start_booking_expiry_task, BatterySwapService, BookingDetails, BookingPolicy, BookingService,
    SlotLockService,
};
pub use identity::{AuthResult, NewUser, UserChanges, UserService};
pub use inventory::{BatteryChanges, BatteryService, StationChanges, StationService};
