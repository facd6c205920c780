//! Completing a booked swap at the station

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::{
    BatterySwap, DomainError, DomainResult, RepositoryProvider, SubscriptionStatus, SwapQuery,
};
use crate::shared::PaginatedResult;

pub struct BatterySwapService {
    repos: Arc<dyn RepositoryProvider>,
}

impl BatterySwapService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Hand out the batteries locked for a booking.
    ///
    /// Each locked slot releases its battery to the driver. The batteries the
    /// driver brings back (`returned_battery_ids`) go into the freed slots in
    /// order and start charging; slots without a returned battery are left
    /// empty. Consumes one swap from the subscription.
    pub async fn complete_swap(
        &self,
        appointment_id: i32,
        returned_battery_ids: Vec<String>,
    ) -> DomainResult<Vec<BatterySwap>> {
        let mut appointment = self
            .repos
            .appointments()
            .find_by_id(appointment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", "id", appointment_id))?;
        if !appointment.is_open() {
            return Err(DomainError::Conflict(format!(
                "Booking {} is already {}",
                appointment_id, appointment.status
            )));
        }

        let slots: Vec<_> = self
            .repos
            .slots()
            .find_by_appointment(appointment_id)
            .await?
            .into_iter()
            .filter(|s| s.is_locked() && s.battery_id.is_some())
            .collect();
        if slots.is_empty() {
            return Err(DomainError::Conflict(format!(
                "Booking {} holds no batteries",
                appointment_id
            )));
        }
        if returned_battery_ids.len() > slots.len() {
            return Err(DomainError::Validation(format!(
                "At most {} batteries can be returned for this booking",
                slots.len()
            )));
        }
        let unique: HashSet<&str> = returned_battery_ids.iter().map(String::as_str).collect();
        if unique.len() != returned_battery_ids.len() {
            return Err(DomainError::Validation("Duplicate returned battery".into()));
        }

        let mut returned = Vec::with_capacity(returned_battery_ids.len());
        for id in &returned_battery_ids {
            let battery = self
                .repos
                .batteries()
                .find_by_id(id)
                .await?
                .ok_or_else(|| DomainError::not_found("Battery", "id", id))?;
            if !battery.is_placeable() {
                return Err(DomainError::Validation(format!(
                    "Battery {} is {} and cannot be accepted",
                    battery.id, battery.status
                )));
            }
            if self.repos.slots().find_by_battery_id(id).await?.is_some() {
                return Err(DomainError::Conflict(format!(
                    "Battery {} is already in a slot",
                    id
                )));
            }
            returned.push(battery);
        }

        let mut subscription = self
            .repos
            .subscriptions()
            .find_by_id(appointment.subscription_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found("Subscription", "id", appointment.subscription_id)
            })?;
        if subscription.status != SubscriptionStatus::Active {
            return Err(DomainError::Conflict(format!(
                "Subscription {} is {}",
                subscription.id, subscription.status
            )));
        }

        let now = Utc::now();
        let mut returned = returned.into_iter();
        let mut swaps = Vec::with_capacity(slots.len());

        for mut slot in slots {
            let Some(out_id) = slot.take_battery() else {
                continue;
            };
            if let Some(mut out) = self.repos.batteries().find_by_id(&out_id).await? {
                out.hand_out();
                self.repos.batteries().update(out).await?;
            }

            let battery_in_id = match returned.next() {
                Some(mut battery) => {
                    battery.return_to(slot.station_id);
                    let battery = self.repos.batteries().update(battery).await?;
                    slot.place_battery(battery.id.clone(), true);
                    Some(battery.id)
                }
                None => None,
            };
            let slot = self.repos.slots().update(slot).await?;

            swaps.push(
                self.repos
                    .swaps()
                    .create(BatterySwap {
                        id: 0,
                        appointment_id,
                        station_id: slot.station_id,
                        user_id: appointment.user_id.clone(),
                        slot_id: slot.id,
                        battery_out_id: out_id,
                        battery_in_id,
                        swapped_at: now,
                    })
                    .await?,
            );
        }

        subscription.consume_swap();
        let subscription = self.repos.subscriptions().update(subscription).await?;

        appointment.complete();
        self.repos.appointments().update(appointment).await?;

        info!(
            appointment_id,
            batteries = swaps.len(),
            remaining_swaps = subscription.remaining_swaps,
            "Battery swap completed"
        );
        Ok(swaps)
    }

    pub async fn list(&self, query: SwapQuery) -> DomainResult<PaginatedResult<BatterySwap>> {
        self.repos.swaps().list(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::booking::{BookingPolicy, BookingService, SlotLockService};
    use crate::application::test_support::*;
    use crate::domain::{AppointmentStatus, Battery, BatteryStatus, SlotStatus, UserRole};
    use chrono::Duration;

    async fn booked(ready: i32, battery_count: i32) -> (Arc<dyn RepositoryProvider>, i32, i32) {
        let repos = repos().await;
        let user = seed_user(&repos, "driver1", UserRole::Driver).await;
        let (station, _) = seed_station(&repos, ready, 0).await;
        let plan = seed_plan(&repos, battery_count, 5).await;
        let sub = seed_active_subscription(&repos, &user.id, &plan).await;
        let bookings = BookingService::new(
            repos.clone(),
            SlotLockService::new(repos.clone()),
            BookingPolicy::default(),
        );
        let booking = bookings
            .create_booking(&user.id, sub.id, station.id, Utc::now() + Duration::hours(1))
            .await
            .unwrap();
        (repos, booking.appointment.id, sub.id)
    }

    #[tokio::test]
    async fn swap_hands_out_locked_batteries_and_takes_returns() {
        let (repos, appointment_id, sub_id) = booked(3, 2).await;
        let mut flat = Battery::new("OLD-1", "LFP-48V", 2.4);
        flat.status = BatteryStatus::InUse;
        flat.state_of_charge = 8;
        repos.batteries().create(flat).await.unwrap();

        let svc = BatterySwapService::new(repos.clone());
        let swaps = svc
            .complete_swap(appointment_id, vec!["OLD-1".into()])
            .await
            .unwrap();

        assert_eq!(swaps.len(), 2);
        assert_eq!(swaps[0].battery_out_id, "BAT-3");
        assert_eq!(swaps[0].battery_in_id.as_deref(), Some("OLD-1"));
        assert_eq!(swaps[1].battery_out_id, "BAT-2");
        assert!(swaps[1].battery_in_id.is_none());

        let out = repos.batteries().find_by_id("BAT-3").await.unwrap().unwrap();
        assert_eq!(out.status, BatteryStatus::InUse);
        assert!(out.station_id.is_none());

        let returned = repos.batteries().find_by_id("OLD-1").await.unwrap().unwrap();
        assert_eq!(returned.status, BatteryStatus::Charging);
        let slot = repos.slots().find_by_id(swaps[0].slot_id).await.unwrap().unwrap();
        assert_eq!(slot.status, SlotStatus::Use);
        let emptied = repos.slots().find_by_id(swaps[1].slot_id).await.unwrap().unwrap();
        assert_eq!(emptied.status, SlotStatus::Available);

        let sub = repos.subscriptions().find_by_id(sub_id).await.unwrap().unwrap();
        assert_eq!(sub.remaining_swaps, 4);
        let appointment = repos
            .appointments()
            .find_by_id(appointment_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Completed);
    }

    #[tokio::test]
    async fn completed_booking_cannot_be_swapped_twice() {
        let (repos, appointment_id, _) = booked(1, 1).await;
        let svc = BatterySwapService::new(repos);
        svc.complete_swap(appointment_id, vec![]).await.unwrap();
        let err = svc.complete_swap(appointment_id, vec![]).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn too_many_returns_are_rejected() {
        let (repos, appointment_id, _) = booked(2, 1).await;
        for id in ["R-1", "R-2"] {
            repos
                .batteries()
                .create(Battery::new(id, "LFP-48V", 2.4))
                .await
                .unwrap();
        }
        let err = BatterySwapService::new(repos)
            .complete_swap(appointment_id, vec!["R-1".into(), "R-2".into()])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn returned_battery_already_slotted_is_conflict() {
        let (repos, appointment_id, _) = booked(2, 1).await;
        // BAT-1 is still sitting in an unlocked ready slot
        let err = BatterySwapService::new(repos)
            .complete_swap(appointment_id, vec!["BAT-1".into()])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
