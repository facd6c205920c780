//! Appointment (booking) aggregate

pub mod model;
pub mod repository;

pub use model::{Appointment, AppointmentQuery, AppointmentStatus};
pub use repository::AppointmentRepository;
