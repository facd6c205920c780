//! Reserving physical battery slots for an appointment

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{DomainError, DomainResult, PillarSlot, RepositoryProvider};

#[derive(Clone)]
pub struct SlotLockService {
    repos: Arc<dyn RepositoryProvider>,
}

impl SlotLockService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Lock as many ready slots at the station as the subscription's plan
    /// hands out per swap.
    ///
    /// All or nothing: an empty result means the station did not have
    /// enough ready batteries and no slot was changed.
    pub async fn lock_slots(
        &self,
        station_id: i32,
        subscription_id: i32,
        booking_id: i32,
    ) -> DomainResult<Vec<PillarSlot>> {
        let subscription = self
            .repos
            .subscriptions()
            .find_by_id(subscription_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Subscription", "id", subscription_id))?;
        let plan = self
            .repos
            .plans()
            .find_by_id(subscription.plan_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Plan", "id", subscription.plan_id))?;

        let required = plan.battery_count.max(0) as u32;
        let locked = self
            .repos
            .slots()
            .lock_slots(station_id, required, booking_id)
            .await?;

        if locked.is_empty() {
            warn!(station_id, booking_id, required, "Not enough ready slots to lock");
        } else {
            metrics::counter!("slots_locked_total").increment(locked.len() as u64);
            info!(station_id, booking_id, count = locked.len(), "Slots locked");
        }
        Ok(locked)
    }

    /// Release every slot held by the appointment. Safe to call repeatedly.
    pub async fn unlock_slots_by_appointment_id(&self, appointment_id: i32) -> DomainResult<u64> {
        let released = self.repos.slots().unlock_by_appointment(appointment_id).await?;
        if released > 0 {
            info!(appointment_id, released, "Slots unlocked");
        }
        Ok(released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::*;
    use crate::domain::{SlotStatus, UserRole};

    #[tokio::test]
    async fn locks_plan_battery_count_from_top_of_station() {
        let repos = repos().await;
        let driver = seed_user(&repos, "driver1", UserRole::Driver).await;
        let (station, _) = seed_station(&repos, 4, 0).await;
        let plan = seed_plan(&repos, 2, 10).await;
        let sub = seed_active_subscription(&repos, &driver.id, &plan).await;

        let svc = SlotLockService::new(repos.clone());
        let locked = svc.lock_slots(station.id, sub.id, 5).await.unwrap();

        assert_eq!(locked.len(), 2);
        assert_eq!(
            locked.iter().map(|s| s.slot_number).collect::<Vec<_>>(),
            vec![4, 3]
        );
        assert_eq!(
            repos
                .slots()
                .count_by_status(station.id, SlotStatus::Unavailable)
                .await
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn short_station_locks_nothing() {
        let repos = repos().await;
        let driver = seed_user(&repos, "driver1", UserRole::Driver).await;
        let (station, _) = seed_station(&repos, 1, 3).await;
        let plan = seed_plan(&repos, 2, 10).await;
        let sub = seed_active_subscription(&repos, &driver.id, &plan).await;

        let svc = SlotLockService::new(repos.clone());
        assert!(svc.lock_slots(station.id, sub.id, 5).await.unwrap().is_empty());
        assert_eq!(
            repos
                .slots()
                .count_by_status(station.id, SlotStatus::Lock)
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn unknown_subscription_is_not_found() {
        let repos = repos().await;
        let (station, _) = seed_station(&repos, 2, 0).await;
        let err = SlotLockService::new(repos)
            .lock_slots(station.id, 404, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn unlock_is_idempotent() {
        let repos = repos().await;
        let driver = seed_user(&repos, "driver1", UserRole::Driver).await;
        let (station, _) = seed_station(&repos, 2, 0).await;
        let plan = seed_plan(&repos, 2, 10).await;
        let sub = seed_active_subscription(&repos, &driver.id, &plan).await;

        let svc = SlotLockService::new(repos.clone());
        svc.lock_slots(station.id, sub.id, 5).await.unwrap();
        assert_eq!(svc.unlock_slots_by_appointment_id(5).await.unwrap(), 2);
        assert_eq!(svc.unlock_slots_by_appointment_id(5).await.unwrap(), 0);
    }
}
