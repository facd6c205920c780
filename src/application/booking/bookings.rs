//! Appointment booking against a subscription

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use super::slot_lock::SlotLockService;
use crate::application::Actor;
use crate::domain::{
    Appointment, AppointmentQuery, DomainError, DomainResult, PillarSlot, RepositoryProvider,
};
use crate::shared::PaginatedResult;

/// Booking window rules
#[derive(Debug, Clone, Copy)]
pub struct BookingPolicy {
    /// How far ahead an appointment may be scheduled
    pub max_days_ahead: i64,
    /// How long after `scheduled_at` a confirmed booking stays open
    pub grace_minutes: i64,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            max_days_ahead: 7,
            grace_minutes: 30,
        }
    }
}

/// An appointment with the slots currently held for it
#[derive(Debug, Clone)]
pub struct BookingDetails {
    pub appointment: Appointment,
    pub slots: Vec<PillarSlot>,
}

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
    slot_lock: SlotLockService,
    policy: BookingPolicy,
}

impl BookingService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        slot_lock: SlotLockService,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            repos,
            slot_lock,
            policy,
        }
    }

    /// Book a swap at a station and lock the batteries for it.
    pub async fn create_booking(
        &self,
        user_id: &str,
        subscription_id: i32,
        station_id: i32,
        scheduled_at: DateTime<Utc>,
    ) -> DomainResult<BookingDetails> {
        let now = Utc::now();
        if scheduled_at <= now {
            return Err(DomainError::Validation(
                "scheduled_at must be in the future".into(),
            ));
        }
        if scheduled_at > now + Duration::days(self.policy.max_days_ahead) {
            return Err(DomainError::Validation(format!(
                "Bookings can be made at most {} days ahead",
                self.policy.max_days_ahead
            )));
        }

        let station = self
            .repos
            .stations()
            .find_by_id(station_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Station", "id", station_id))?;
        if !station.is_active {
            return Err(DomainError::Conflict(format!(
                "Station {} is not accepting bookings",
                station_id
            )));
        }

        let subscription = self
            .repos
            .subscriptions()
            .find_by_id(subscription_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Subscription", "id", subscription_id))?;
        if subscription.user_id != user_id {
            return Err(DomainError::Forbidden(
                "Subscription belongs to another user".into(),
            ));
        }
        if !subscription.can_swap(now) {
            return Err(DomainError::Conflict(
                "Subscription is not active or has no swaps left".into(),
            ));
        }

        let open = self
            .repos
            .appointments()
            .find_open_for_subscription(subscription_id)
            .await?;
        if open.len() as i32 >= subscription.remaining_swaps {
            return Err(DomainError::Conflict(
                "Every remaining swap is already booked".into(),
            ));
        }

        let mut appointment = self
            .repos
            .appointments()
            .create(Appointment::new(
                user_id,
                subscription_id,
                station_id,
                scheduled_at,
            ))
            .await?;

        let slots = self
            .slot_lock
            .lock_slots(station_id, subscription_id, appointment.id)
            .await?;
        if slots.is_empty() {
            appointment.cancel();
            self.repos.appointments().update(appointment).await?;
            return Err(DomainError::Conflict(
                "Not enough batteries available at this station".into(),
            ));
        }

        metrics::counter!("bookings_created_total").increment(1);
        info!(
            appointment_id = appointment.id,
            station_id,
            user_id,
            slots = slots.len(),
            "Booking confirmed"
        );
        Ok(BookingDetails { appointment, slots })
    }

    pub async fn list(&self, query: AppointmentQuery) -> DomainResult<PaginatedResult<Appointment>> {
        self.repos.appointments().list(query).await
    }

    async fn find(&self, id: i32) -> DomainResult<Appointment> {
        self.repos
            .appointments()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", "id", id))
    }

    pub async fn get(&self, id: i32, actor: &Actor) -> DomainResult<BookingDetails> {
        let appointment = self.find(id).await?;
        actor.ensure_can_access(&appointment.user_id, "Booking")?;
        let slots = self.repos.slots().find_by_appointment(id).await?;
        Ok(BookingDetails { appointment, slots })
    }

    /// Cancel an open booking and release its slots.
    pub async fn cancel(&self, id: i32, actor: &Actor) -> DomainResult<Appointment> {
        let appointment = self.find(id).await?;
        actor.ensure_can_access(&appointment.user_id, "Booking")?;
        if !appointment.is_open() {
            return Err(DomainError::Conflict(format!(
                "Booking {} is already {}",
                id, appointment.status
            )));
        }
        let appointment = self.close(appointment, false).await?;
        info!(appointment_id = id, "Booking cancelled");
        Ok(appointment)
    }

    /// Expire confirmed bookings whose grace period ended before `now`.
    pub async fn expire_overdue(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let cutoff = now - Duration::minutes(self.policy.grace_minutes);
        let overdue = self.repos.appointments().find_overdue(cutoff).await?;
        if overdue.is_empty() {
            return Ok(0);
        }

        info!(count = overdue.len(), "Expiring overdue bookings");
        let mut expired = 0;
        for appointment in overdue {
            let id = appointment.id;
            match self.close(appointment, true).await {
                Ok(_) => expired += 1,
                Err(e) => warn!(appointment_id = id, error = %e, "Failed to expire booking"),
            }
        }
        Ok(expired)
    }

    /// Unlock, then mark cancelled or expired.
    pub(crate) async fn close(
        &self,
        mut appointment: Appointment,
        expired: bool,
    ) -> DomainResult<Appointment> {
        self.slot_lock
            .unlock_slots_by_appointment_id(appointment.id)
            .await?;
        if expired {
            appointment.expire();
        } else {
            appointment.cancel();
        }
        self.repos.appointments().update(appointment).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::*;
    use crate::domain::{AppointmentStatus, SlotStatus, Subscription, UserRole};

    struct Fixture {
        repos: Arc<dyn RepositoryProvider>,
        svc: BookingService,
        driver: Actor,
        station_id: i32,
        subscription: Subscription,
    }

    async fn fixture(ready: i32, battery_count: i32, swap_limit: i32) -> Fixture {
        let repos = repos().await;
        let user = seed_user(&repos, "driver1", UserRole::Driver).await;
        let (station, _) = seed_station(&repos, ready, 0).await;
        let plan = seed_plan(&repos, battery_count, swap_limit).await;
        let subscription = seed_active_subscription(&repos, &user.id, &plan).await;
        let svc = BookingService::new(
            repos.clone(),
            SlotLockService::new(repos.clone()),
            BookingPolicy::default(),
        );
        Fixture {
            repos,
            svc,
            driver: Actor::new(user.id, UserRole::Driver),
            station_id: station.id,
            subscription,
        }
    }

    fn in_hours(h: i64) -> DateTime<Utc> {
        Utc::now() + Duration::hours(h)
    }

    #[tokio::test]
    async fn booking_locks_plan_batteries() {
        let f = fixture(4, 2, 5).await;
        let booking = f
            .svc
            .create_booking(&f.driver.user_id, f.subscription.id, f.station_id, in_hours(2))
            .await
            .unwrap();

        assert_eq!(booking.appointment.status, AppointmentStatus::Confirmed);
        assert_eq!(booking.slots.len(), 2);
        assert!(booking
            .slots
            .iter()
            .all(|s| s.appointment_id == Some(booking.appointment.id)));
    }

    #[tokio::test]
    async fn short_station_conflicts_without_locking() {
        let f = fixture(1, 2, 5).await;
        let err = f
            .svc
            .create_booking(&f.driver.user_id, f.subscription.id, f.station_id, in_hours(2))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(
            f.repos
                .slots()
                .count_by_status(f.station_id, SlotStatus::Lock)
                .await
                .unwrap(),
            0
        );
        assert!(f
            .repos
            .appointments()
            .find_open_for_subscription(f.subscription.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn rejects_past_and_far_future_times() {
        let f = fixture(2, 1, 5).await;
        for at in [in_hours(-1), in_hours(24 * 30)] {
            let err = f
                .svc
                .create_booking(&f.driver.user_id, f.subscription.id, f.station_id, at)
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn other_users_subscription_is_forbidden() {
        let f = fixture(2, 1, 5).await;
        let err = f
            .svc
            .create_booking("someone-else", f.subscription.id, f.station_id, in_hours(1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn open_bookings_cannot_exceed_remaining_swaps() {
        let f = fixture(4, 1, 1).await;
        f.svc
            .create_booking(&f.driver.user_id, f.subscription.id, f.station_id, in_hours(1))
            .await
            .unwrap();
        let err = f
            .svc
            .create_booking(&f.driver.user_id, f.subscription.id, f.station_id, in_hours(2))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn cancel_unlocks_slots() {
        let f = fixture(2, 2, 5).await;
        let booking = f
            .svc
            .create_booking(&f.driver.user_id, f.subscription.id, f.station_id, in_hours(1))
            .await
            .unwrap();

        let stranger = Actor::new("stranger", UserRole::Driver);
        assert!(matches!(
            f.svc
                .cancel(booking.appointment.id, &stranger)
                .await
                .unwrap_err(),
            DomainError::Forbidden(_)
        ));

        let cancelled = f.svc.cancel(booking.appointment.id, &f.driver).await.unwrap();
        assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
        assert_eq!(
            f.repos
                .slots()
                .count_by_status(f.station_id, SlotStatus::Unavailable)
                .await
                .unwrap(),
            2
        );

        let err = f
            .svc
            .cancel(booking.appointment.id, &f.driver)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn overdue_bookings_expire_and_release_slots() {
        let f = fixture(2, 2, 5).await;
        let booking = f
            .svc
            .create_booking(&f.driver.user_id, f.subscription.id, f.station_id, in_hours(1))
            .await
            .unwrap();

        assert_eq!(f.svc.expire_overdue(Utc::now()).await.unwrap(), 0);

        let expired = f.svc.expire_overdue(in_hours(3)).await.unwrap();
        assert_eq!(expired, 1);
        let details = f.svc.get(booking.appointment.id, &f.driver).await.unwrap();
        assert_eq!(details.appointment.status, AppointmentStatus::Expired);
        assert!(details.slots.is_empty());
    }
}
