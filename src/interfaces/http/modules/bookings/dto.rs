//! Booking DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::BookingDetails;
use crate::domain::{Appointment, AppointmentStatus};
use crate::interfaces::http::common::{parse_enum, ApiError};
use crate::interfaces::http::modules::stations::SlotDto;

const BOOKING_STATUSES: [(&str, AppointmentStatus); 4] = [
    ("Confirmed", AppointmentStatus::Confirmed),
    ("Completed", AppointmentStatus::Completed),
    ("Cancelled", AppointmentStatus::Cancelled),
    ("Expired", AppointmentStatus::Expired),
];

pub(crate) fn parse_booking_status(value: &str) -> Result<AppointmentStatus, ApiError> {
    parse_enum(value, &BOOKING_STATUSES)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    pub id: i32,
    pub user_id: String,
    pub subscription_id: i32,
    pub station_id: i32,
    pub scheduled_at: DateTime<Utc>,
    /// `Confirmed`, `Completed`, `Cancelled` or `Expired`
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Appointment> for BookingDto {
    fn from(a: Appointment) -> Self {
        Self {
            id: a.id,
            user_id: a.user_id,
            subscription_id: a.subscription_id,
            station_id: a.station_id,
            scheduled_at: a.scheduled_at,
            status: a.status.to_string(),
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// Booking with the slots locked for it
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDetailsDto {
    pub booking: BookingDto,
    pub slots: Vec<SlotDto>,
}

impl From<BookingDetails> for BookingDetailsDto {
    fn from(d: BookingDetails) -> Self {
        Self {
            booking: d.appointment.into(),
            slots: d.slots.into_iter().map(SlotDto::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "subscription_id": 7,
    "station_id": 3,
    "scheduled_at": "2026-10-20T08:30:00Z"
}))]
pub struct CreateBookingRequest {
    #[validate(range(min = 1))]
    pub subscription_id: i32,
    #[validate(range(min = 1))]
    pub station_id: i32,
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MyBookingsParams {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListBookingsParams {
    pub user_id: Option<String>,
    pub station_id: Option<i32>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
