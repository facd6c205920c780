//! Subscription lifecycle after checkout

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::application::booking::SlotLockService;
use crate::application::Actor;
use crate::domain::{
    Appointment, DomainError, DomainResult, RepositoryProvider, Subscription, SubscriptionStatus,
};
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SubscriptionService {
    repos: Arc<dyn RepositoryProvider>,
    slot_lock: SlotLockService,
}

impl SubscriptionService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, slot_lock: SlotLockService) -> Self {
        Self { repos, slot_lock }
    }

    pub async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<Subscription>> {
        self.repos.subscriptions().list_by_user(user_id).await
    }

    pub async fn list(
        &self,
        status: Option<SubscriptionStatus>,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<Subscription>> {
        self.repos.subscriptions().list(status, pagination).await
    }

    pub async fn get(&self, id: i32, actor: &Actor) -> DomainResult<Subscription> {
        let subscription = self
            .repos
            .subscriptions()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Subscription", "id", id))?;
        actor.ensure_can_access(&subscription.user_id, "Subscription")?;
        Ok(subscription)
    }

    /// Cancel a pending or active subscription along with its open bookings.
    pub async fn cancel(&self, id: i32, actor: &Actor) -> DomainResult<Subscription> {
        let mut subscription = self.get(id, actor).await?;
        if !subscription.is_cancellable() {
            return Err(DomainError::Conflict(format!(
                "Subscription {} is already {}",
                id, subscription.status
            )));
        }

        let closed = self.close_open_bookings(id).await?;
        subscription.cancel();
        let subscription = self.repos.subscriptions().update(subscription).await?;
        info!(subscription_id = id, closed_bookings = closed, "Subscription cancelled");
        Ok(subscription)
    }

    /// Expire active subscriptions whose end date is before `now`.
    pub async fn expire_ended(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let ended = self.repos.subscriptions().find_ended(now).await?;
        let mut expired = 0;
        for mut subscription in ended {
            let id = subscription.id;
            if let Err(e) = self.close_open_bookings(id).await {
                warn!(subscription_id = id, error = %e, "Failed to close bookings");
                continue;
            }
            subscription.expire();
            match self.repos.subscriptions().update(subscription).await {
                Ok(_) => expired += 1,
                Err(e) => warn!(subscription_id = id, error = %e, "Failed to expire subscription"),
            }
        }
        Ok(expired)
    }

    async fn close_open_bookings(&self, subscription_id: i32) -> DomainResult<usize> {
        let open: Vec<Appointment> = self
            .repos
            .appointments()
            .find_open_for_subscription(subscription_id)
            .await?;
        let count = open.len();
        for mut appointment in open {
            self.slot_lock
                .unlock_slots_by_appointment_id(appointment.id)
                .await?;
            appointment.cancel();
            self.repos.appointments().update(appointment).await?;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::booking::{BookingPolicy, BookingService};
    use crate::application::test_support::*;
    use crate::domain::{AppointmentStatus, SlotStatus, UserRole};
    use chrono::Duration;

    #[tokio::test]
    async fn cancel_releases_open_bookings() {
        let repos = repos().await;
        let user = seed_user(&repos, "driver1", UserRole::Driver).await;
        let (station, _) = seed_station(&repos, 2, 0).await;
        let plan = seed_plan(&repos, 2, 5).await;
        let sub = seed_active_subscription(&repos, &user.id, &plan).await;
        let slot_lock = SlotLockService::new(repos.clone());
        let booking = BookingService::new(repos.clone(), slot_lock.clone(), BookingPolicy::default())
            .create_booking(&user.id, sub.id, station.id, Utc::now() + Duration::hours(1))
            .await
            .unwrap();

        let svc = SubscriptionService::new(repos.clone(), slot_lock);
        let actor = Actor::new(user.id.clone(), UserRole::Driver);
        let cancelled = svc.cancel(sub.id, &actor).await.unwrap();
        assert_eq!(cancelled.status, SubscriptionStatus::Cancelled);

        let appointment = repos
            .appointments()
            .find_by_id(booking.appointment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Cancelled);
        assert_eq!(
            repos
                .slots()
                .count_by_status(station.id, SlotStatus::Lock)
                .await
                .unwrap(),
            0
        );

        assert!(matches!(
            svc.cancel(sub.id, &actor).await.unwrap_err(),
            DomainError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn drivers_only_see_their_own() {
        let repos = repos().await;
        let owner = seed_user(&repos, "driver1", UserRole::Driver).await;
        let plan = seed_plan(&repos, 1, 5).await;
        let sub = seed_active_subscription(&repos, &owner.id, &plan).await;
        let svc = SubscriptionService::new(repos.clone(), SlotLockService::new(repos));

        let other = Actor::new("other", UserRole::Driver);
        assert!(matches!(
            svc.get(sub.id, &other).await.unwrap_err(),
            DomainError::Forbidden(_)
        ));
        let staff = Actor::new("staff", UserRole::Staff);
        assert_eq!(svc.get(sub.id, &staff).await.unwrap().id, sub.id);
    }

    #[tokio::test]
    async fn ended_subscriptions_expire() {
        let repos = repos().await;
        let owner = seed_user(&repos, "driver1", UserRole::Driver).await;
        let plan = seed_plan(&repos, 1, 5).await;
        let sub = seed_active_subscription(&repos, &owner.id, &plan).await;
        let svc = SubscriptionService::new(repos.clone(), SlotLockService::new(repos.clone()));

        assert_eq!(svc.expire_ended(Utc::now()).await.unwrap(), 0);
        assert_eq!(
            svc.expire_ended(Utc::now() + Duration::days(31)).await.unwrap(),
            1
        );
        let reloaded = repos.subscriptions().find_by_id(sub.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, SubscriptionStatus::Expired);
    }
}
