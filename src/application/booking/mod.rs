//! Booking workflow: slot locking, appointments, swaps and expiry

pub mod bookings;
pub mod expiry;
pub mod slot_lock;
pub mod swaps;

pub use bookings::{BookingDetails, BookingPolicy, BookingService};
pub use expiry::start_booking_expiry_task;
pub use slot_lock::SlotLockService;
pub use swaps::BatterySwapService;
