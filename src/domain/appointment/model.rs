//! Appointment domain entity

use chrono::{DateTime, Utc};

use crate::shared::PaginationParams;

/// Appointment status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentStatus {
    /// Booked; slots are locked
    Confirmed,
    /// Swap done
    Completed,
    Cancelled,
    /// Driver did not show up within the grace period
    Expired,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "Confirmed",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Expired => "Expired",
        }
    }
}

impl From<&str> for AppointmentStatus {
    fn from(s: &str) -> Self {
        match s {
            "Confirmed" => Self::Confirmed,
            "Completed" => Self::Completed,
            "Expired" => Self::Expired,
            _ => Self::Cancelled,
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduled battery swap
#[derive(Debug, Clone)]
pub struct Appointment {
    pub id: i32,
    pub user_id: String,
    pub subscription_id: i32,
    pub station_id: i32,
    pub scheduled_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn new(
        user_id: impl Into<String>,
        subscription_id: i32,
        station_id: i32,
        scheduled_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            user_id: user_id.into(),
            subscription_id,
            station_id,
            scheduled_at,
            status: AppointmentStatus::Confirmed,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == AppointmentStatus::Confirmed
    }

    pub fn cancel(&mut self) {
        self.set_status(AppointmentStatus::Cancelled);
    }

    pub fn expire(&mut self) {
        self.set_status(AppointmentStatus::Expired);
    }

    pub fn complete(&mut self) {
        self.set_status(AppointmentStatus::Completed);
    }

    fn set_status(&mut self, status: AppointmentStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

/// Filters for listing appointments
#[derive(Debug, Clone, Default)]
pub struct AppointmentQuery {
    pub user_id: Option<String>,
    pub station_id: Option<i32>,
    pub status: Option<AppointmentStatus>,
    pub pagination: PaginationParams,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample() -> Appointment {
        Appointment::new("u1", 1, 1, Utc::now() + Duration::hours(2))
    }

    #[test]
    fn new_appointment_is_open() {
        let a = sample();
        assert!(a.is_open());
        assert_eq!(a.status, AppointmentStatus::Confirmed);
    }

    #[test]
    fn terminal_states_are_closed() {
        let mut a = sample();
        a.cancel();
        assert!(!a.is_open());

        let mut a = sample();
        a.expire();
        assert_eq!(a.status, AppointmentStatus::Expired);

        let mut a = sample();
        a.complete();
        assert_eq!(a.status, AppointmentStatus::Completed);
    }

    #[test]
    fn unknown_status_defaults_to_cancelled() {
        assert_eq!(AppointmentStatus::from("???"), AppointmentStatus::Cancelled);
    }
}
