//! Background task that periodically expires overdue bookings and ended
//! subscriptions.
//!
//! Runs in a tokio::spawn loop. Expiring a booking releases its locked slots.

use std::sync::Arc;

use chrono::Utc;
use tokio::time::Duration;
use tracing::{info, warn};

use super::bookings::BookingService;
use crate::application::billing::SubscriptionService;
use crate::shared::shutdown::ShutdownSignal;

/// Start the booking expiry background task.
///
/// Every `check_interval_secs` the task expires confirmed bookings whose
/// grace period has passed, then active subscriptions past their end date.
pub fn start_booking_expiry_task(
    bookings: Arc<BookingService>,
    subscriptions: Arc<SubscriptionService>,
    shutdown: ShutdownSignal,
    check_interval_secs: u64,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            check_interval = check_interval_secs,
            "📅 Booking expiry task started"
        );

        let mut interval = tokio::time::interval(Duration::from_secs(check_interval_secs.max(1)));

        loop {
            tokio::select! {
                _ = interval.tick() => run_once(&bookings, &subscriptions).await,
                _ = shutdown.wait() => {
                    info!("📅 Booking expiry task shutting down");
                    break;
                }
            }
        }

        info!("📅 Booking expiry task stopped");
    })
}

async fn run_once(bookings: &BookingService, subscriptions: &SubscriptionService) {
    let now = Utc::now();
    match bookings.expire_overdue(now).await {
        Ok(0) => {}
        Ok(count) => info!(count, "Expired overdue bookings"),
        Err(e) => warn!(error = %e, "Booking expiry check error"),
    }
    match subscriptions.expire_ended(now).await {
        Ok(0) => {}
        Ok(count) => info!(count, "Expired ended subscriptions"),
        Err(e) => warn!(error = %e, "Subscription expiry check error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::booking::{BookingPolicy, SlotLockService};
    use crate::application::test_support::*;
    use crate::domain::{AppointmentStatus, UserRole};
    use crate::shared::shutdown::ShutdownSignal;

    #[tokio::test]
    async fn task_expires_past_bookings_and_stops_on_shutdown() {
        let repos = repos().await;
        let user = seed_user(&repos, "driver1", UserRole::Driver).await;
        let (station, _) = seed_station(&repos, 1, 0).await;
        let plan = seed_plan(&repos, 1, 5).await;
        let sub = seed_active_subscription(&repos, &user.id, &plan).await;

        // Insert a booking that is already past its grace period
        let slot_lock = SlotLockService::new(repos.clone());
        let appointment = repos
            .appointments()
            .create(crate::domain::Appointment::new(
                &user.id,
                sub.id,
                station.id,
                Utc::now() - chrono::Duration::hours(2),
            ))
            .await
            .unwrap();
        slot_lock
            .lock_slots(station.id, sub.id, appointment.id)
            .await
            .unwrap();

        let bookings = Arc::new(BookingService::new(
            repos.clone(),
            slot_lock.clone(),
            BookingPolicy::default(),
        ));
        let subscriptions = Arc::new(SubscriptionService::new(repos.clone(), slot_lock));
        let shutdown = ShutdownSignal::new();
        let handle = start_booking_expiry_task(bookings, subscriptions, shutdown.clone(), 3600);

        // First tick fires immediately
        for _ in 0..50 {
            let a = repos
                .appointments()
                .find_by_id(appointment.id)
                .await
                .unwrap()
                .unwrap();
            if a.status == AppointmentStatus::Expired {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        let a = repos
            .appointments()
            .find_by_id(appointment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(a.status, AppointmentStatus::Expired);
        assert!(repos
            .slots()
            .find_by_appointment(appointment.id)
            .await
            .unwrap()
            .is_empty());

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
