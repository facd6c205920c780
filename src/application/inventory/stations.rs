//! Station, pillar and slot management

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::{
    AppointmentQuery, AppointmentStatus, BatteryStatus, DomainError, DomainResult, Pillar,
    PillarSlot, RepositoryProvider, SlotAvailability, SlotStatus, Station, StationQuery, SwapQuery,
};
use crate::shared::{PaginatedResult, PaginationParams};

pub const MAX_SLOTS_PER_PILLAR: i32 = 50;

/// Editable station fields; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct StationChanges {
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_active: Option<bool>,
}

pub struct StationService {
    repos: Arc<dyn RepositoryProvider>,
}

fn check_coordinates(latitude: f64, longitude: f64) -> DomainResult<()> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(DomainError::Validation("Coordinates out of range".into()));
    }
    Ok(())
}

impl StationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    // ── Stations ────────────────────────────────────────────────

    pub async fn create_station(&self, station: Station) -> DomainResult<Station> {
        check_coordinates(station.latitude, station.longitude)?;
        let station = self.repos.stations().create(station).await?;
        info!(station_id = station.id, name = %station.name, "Station created");
        Ok(station)
    }

    pub async fn get_station(&self, id: i32) -> DomainResult<Station> {
        self.repos
            .stations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Station", "id", id))
    }

    pub async fn list_stations(&self, query: StationQuery) -> DomainResult<PaginatedResult<Station>> {
        self.repos.stations().list(query).await
    }

    pub async fn update_station(&self, id: i32, changes: StationChanges) -> DomainResult<Station> {
        let mut station = self.get_station(id).await?;
        if let Some(name) = changes.name {
            station.name = name;
        }
        if let Some(address) = changes.address {
            station.address = address;
        }
        if let Some(latitude) = changes.latitude {
            station.latitude = latitude;
        }
        if let Some(longitude) = changes.longitude {
            station.longitude = longitude;
        }
        if let Some(is_active) = changes.is_active {
            station.is_active = is_active;
        }
        check_coordinates(station.latitude, station.longitude)?;
        self.repos.stations().update(station).await
    }

    /// Delete a station. Refused while it has confirmed bookings, slotted
    /// batteries or swap history.
    pub async fn delete_station(&self, id: i32) -> DomainResult<()> {
        self.get_station(id).await?;
        let open = self
            .repos
            .appointments()
            .list(AppointmentQuery {
                station_id: Some(id),
                status: Some(AppointmentStatus::Confirmed),
                pagination: PaginationParams::new(Some(1), Some(1)),
                ..Default::default()
            })
            .await?;
        if open.total > 0 {
            return Err(DomainError::Conflict(format!(
                "Station {} has {} open bookings",
                id, open.total
            )));
        }
        let stocked = self
            .repos
            .slots()
            .list_by_station(id, None)
            .await?
            .iter()
            .filter(|slot| slot.battery_id.is_some())
            .count();
        if stocked > 0 {
            return Err(DomainError::Conflict(format!(
                "Station {} still holds {} batteries",
                id, stocked
            )));
        }
        let swaps = self
            .repos
            .swaps()
            .list(SwapQuery {
                station_id: Some(id),
                pagination: PaginationParams::new(Some(1), Some(1)),
                ..Default::default()
            })
            .await?;
        if swaps.total > 0 {
            return Err(DomainError::Conflict(format!(
                "Station {} has swap history; deactivate it instead",
                id
            )));
        }
        self.repos.stations().delete(id).await?;
        info!(station_id = id, "Station deleted");
        Ok(())
    }

    // ── Pillars ─────────────────────────────────────────────────

    /// Add a pillar with `slot_count` empty slots numbered from 1.
    pub async fn add_pillar(
        &self,
        station_id: i32,
        code: &str,
        slot_count: i32,
    ) -> DomainResult<(Pillar, Vec<PillarSlot>)> {
        if !(1..=MAX_SLOTS_PER_PILLAR).contains(&slot_count) {
            return Err(DomainError::Validation(format!(
                "slot_count must be between 1 and {}",
                MAX_SLOTS_PER_PILLAR
            )));
        }
        self.get_station(station_id).await?;

        let pillar = self
            .repos
            .pillars()
            .create(Pillar::new(station_id, code))
            .await?;
        let mut slots = Vec::with_capacity(slot_count as usize);
        for n in 1..=slot_count {
            slots.push(
                self.repos
                    .slots()
                    .create(PillarSlot::new(pillar.id, station_id, n))
                    .await?,
            );
        }

        info!(station_id, pillar_id = pillar.id, slot_count, "Pillar added");
        Ok((pillar, slots))
    }

    pub async fn list_pillars(&self, station_id: i32) -> DomainResult<Vec<Pillar>> {
        self.get_station(station_id).await?;
        self.repos.pillars().list_by_station(station_id).await
    }

    // ── Slots ───────────────────────────────────────────────────

    pub async fn list_slots(
        &self,
        station_id: i32,
        status: Option<SlotStatus>,
    ) -> DomainResult<Vec<PillarSlot>> {
        self.get_station(station_id).await?;
        self.repos.slots().list_by_station(station_id, status).await
    }

    pub async fn availability(&self, station_id: i32) -> DomainResult<SlotAvailability> {
        self.get_station(station_id).await?;
        let slots = self.repos.slots();
        Ok(SlotAvailability {
            station_id,
            empty: slots.count_by_status(station_id, SlotStatus::Available).await?,
            ready: slots.count_by_status(station_id, SlotStatus::Unavailable).await?,
            locked: slots.count_by_status(station_id, SlotStatus::Lock).await?,
            charging: slots.count_by_status(station_id, SlotStatus::Use).await?,
        })
    }

    async fn get_slot(&self, slot_id: i32) -> DomainResult<PillarSlot> {
        self.repos
            .slots()
            .find_by_id(slot_id)
            .await?
            .ok_or_else(|| DomainError::not_found("PillarSlot", "id", slot_id))
    }

    /// Put a battery into an empty slot.
    ///
    /// A `Ready` battery makes the slot bookable (`Unavailable`); anything
    /// else goes on charge (`Use`).
    pub async fn place_battery(&self, slot_id: i32, battery_id: &str) -> DomainResult<PillarSlot> {
        let mut slot = self.get_slot(slot_id).await?;
        if slot.status != SlotStatus::Available || slot.battery_id.is_some() {
            return Err(DomainError::Conflict(format!("Slot {} is not empty", slot_id)));
        }

        let mut battery = self
            .repos
            .batteries()
            .find_by_id(battery_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Battery", "id", battery_id))?;
        if !battery.is_placeable() {
            return Err(DomainError::Validation(format!(
                "Battery {} is {} and cannot be placed",
                battery.id, battery.status
            )));
        }
        if self.repos.slots().find_by_battery_id(battery_id).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "Battery {} already occupies a slot",
                battery_id
            )));
        }

        let charging = battery.status != BatteryStatus::Ready;
        if charging {
            battery.status = BatteryStatus::Charging;
        }
        battery.station_id = Some(slot.station_id);
        battery.updated_at = Utc::now();
        self.repos.batteries().update(battery).await?;

        slot.place_battery(battery_id, charging);
        let slot = self.repos.slots().update(slot).await?;
        info!(slot_id, battery_id, status = %slot.status, "Battery placed");
        Ok(slot)
    }

    /// Take the battery out of a slot, leaving it empty.
    pub async fn remove_battery(&self, slot_id: i32) -> DomainResult<PillarSlot> {
        let mut slot = self.get_slot(slot_id).await?;
        if slot.is_locked() {
            return Err(DomainError::Conflict(format!(
                "Slot {} is locked for a booking",
                slot_id
            )));
        }
        let Some(battery_id) = slot.take_battery() else {
            return Err(DomainError::Validation(format!("Slot {} is empty", slot_id)));
        };

        if let Some(mut battery) = self.repos.batteries().find_by_id(&battery_id).await? {
            battery.station_id = None;
            battery.updated_at = Utc::now();
            self.repos.batteries().update(battery).await?;
        }

        let slot = self.repos.slots().update(slot).await?;
        info!(slot_id, battery_id = %battery_id, "Battery removed");
        Ok(slot)
    }

    /// Manual status override by staff.
    ///
    /// `Lock` is reserved for bookings and cannot be set or cleared here.
    pub async fn set_slot_status(&self, slot_id: i32, status: SlotStatus) -> DomainResult<PillarSlot> {
        let mut slot = self.get_slot(slot_id).await?;
        if slot.is_locked() || status == SlotStatus::Lock {
            return Err(DomainError::Conflict(
                "Locked slots are managed by bookings".into(),
            ));
        }

        match (status, slot.battery_id.as_deref()) {
            (SlotStatus::Available, Some(_)) => {
                return Err(DomainError::Validation(
                    "Remove the battery before marking the slot empty".into(),
                ));
            }
            (SlotStatus::Unavailable | SlotStatus::Use, None) => {
                return Err(DomainError::Validation(format!(
                    "Slot {} holds no battery",
                    slot_id
                )));
            }
            (SlotStatus::Unavailable, Some(battery_id)) => {
                self.set_battery_status(battery_id, BatteryStatus::Ready).await?;
            }
            (SlotStatus::Use, Some(battery_id)) => {
                self.set_battery_status(battery_id, BatteryStatus::Charging).await?;
            }
            _ => {}
        }

        slot.status = status;
        let slot = self.repos.slots().update(slot).await?;
        info!(slot_id, status = %slot.status, "Slot status changed");
        Ok(slot)
    }

    async fn set_battery_status(&self, battery_id: &str, status: BatteryStatus) -> DomainResult<()> {
        let mut battery = self
            .repos
            .batteries()
            .find_by_id(battery_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Battery", "id", battery_id))?;
        battery.status = status;
        battery.updated_at = Utc::now();
        self.repos.batteries().update(battery).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{repos, seed_station};
    use crate::domain::Battery;

    #[tokio::test]
    async fn add_pillar_creates_numbered_empty_slots() {
        let repos = repos().await;
        let svc = StationService::new(repos.clone());
        let station = svc
            .create_station(Station::new("North", "2 High St", 21.0, 105.8))
            .await
            .unwrap();

        let (pillar, slots) = svc.add_pillar(station.id, "P1", 4).await.unwrap();
        assert_eq!(pillar.station_id, station.id);
        assert_eq!(
            slots.iter().map(|s| s.slot_number).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        assert!(slots.iter().all(|s| s.status == SlotStatus::Available));

        let availability = svc.availability(station.id).await.unwrap();
        assert_eq!(availability.empty, 4);
        assert_eq!(availability.total(), 4);
    }

    #[tokio::test]
    async fn invalid_coordinates_are_rejected() {
        let svc = StationService::new(repos().await);
        let err = svc
            .create_station(Station::new("Nowhere", "?", 120.0, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn placing_ready_battery_makes_slot_bookable() {
        let repos = repos().await;
        let svc = StationService::new(repos.clone());
        let (station, slots) = seed_station(&repos, 0, 2).await;
        repos
            .batteries()
            .create(Battery::new("BAT-9", "LFP-48V", 2.4))
            .await
            .unwrap();

        let slot = svc.place_battery(slots[0].id, "BAT-9").await.unwrap();
        assert_eq!(slot.status, SlotStatus::Unavailable);
        let battery = repos.batteries().find_by_id("BAT-9").await.unwrap().unwrap();
        assert_eq!(battery.station_id, Some(station.id));

        // Same battery cannot go into a second slot
        let err = svc.place_battery(slots[1].id, "BAT-9").await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn locked_slot_cannot_be_touched_manually() {
        let repos = repos().await;
        let svc = StationService::new(repos.clone());
        let (station, slots) = seed_station(&repos, 1, 0).await;
        repos.slots().lock_slots(station.id, 1, 77).await.unwrap();

        assert!(matches!(
            svc.remove_battery(slots[0].id).await.unwrap_err(),
            DomainError::Conflict(_)
        ));
        assert!(matches!(
            svc.set_slot_status(slots[0].id, SlotStatus::Use)
                .await
                .unwrap_err(),
            DomainError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn charging_slot_becomes_ready() {
        let repos = repos().await;
        let svc = StationService::new(repos.clone());
        let (_, slots) = seed_station(&repos, 1, 0).await;

        let slot = svc.set_slot_status(slots[0].id, SlotStatus::Use).await.unwrap();
        assert_eq!(slot.status, SlotStatus::Use);
        let battery = repos.batteries().find_by_id("BAT-1").await.unwrap().unwrap();
        assert_eq!(battery.status, BatteryStatus::Charging);

        svc.set_slot_status(slots[0].id, SlotStatus::Unavailable)
            .await
            .unwrap();
        let battery = repos.batteries().find_by_id("BAT-1").await.unwrap().unwrap();
        assert_eq!(battery.status, BatteryStatus::Ready);
    }

    #[tokio::test]
    async fn remove_battery_empties_slot() {
        let repos = repos().await;
        let svc = StationService::new(repos.clone());
        let (_, slots) = seed_station(&repos, 1, 0).await;

        let slot = svc.remove_battery(slots[0].id).await.unwrap();
        assert_eq!(slot.status, SlotStatus::Available);
        assert!(slot.battery_id.is_none());
        let battery = repos.batteries().find_by_id("BAT-1").await.unwrap().unwrap();
        assert!(battery.station_id.is_none());
    }

    #[tokio::test]
    async fn stocked_station_cannot_be_deleted() {
        let repos = repos().await;
        let svc = StationService::new(repos.clone());
        let (station, slots) = seed_station(&repos, 2, 1).await;

        let err = svc.delete_station(station.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        let battery = repos.batteries().find_by_id("BAT-1").await.unwrap().unwrap();
        assert_eq!(battery.station_id, Some(station.id));

        for slot in slots.iter().take(2) {
            svc.remove_battery(slot.id).await.unwrap();
        }
        svc.delete_station(station.id).await.unwrap();
        assert!(repos.stations().find_by_id(station.id).await.unwrap().is_none());
    }
}
