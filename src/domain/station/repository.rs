//! Station, pillar and slot repository interfaces

use async_trait::async_trait;

use super::{Pillar, PillarSlot, SlotStatus, Station, StationQuery};
use crate::shared::{DomainResult, PaginatedResult};

#[async_trait]
pub trait StationRepository: Send + Sync {
    async fn create(&self, station: Station) -> DomainResult<Station>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Station>>;
    async fn list(&self, query: StationQuery) -> DomainResult<PaginatedResult<Station>>;
    async fn update(&self, station: Station) -> DomainResult<Station>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
}

#[async_trait]
pub trait PillarRepository: Send + Sync {
    async fn create(&self, pillar: Pillar) -> DomainResult<Pillar>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Pillar>>;
    async fn list_by_station(&self, station_id: i32) -> DomainResult<Vec<Pillar>>;
}

#[async_trait]
pub trait PillarSlotRepository: Send + Sync {
    async fn create(&self, slot: PillarSlot) -> DomainResult<PillarSlot>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<PillarSlot>>;
    async fn find_by_battery_id(&self, battery_id: &str) -> DomainResult<Option<PillarSlot>>;
    async fn find_by_appointment(&self, appointment_id: i32) -> DomainResult<Vec<PillarSlot>>;

    /// Slots of a station ordered by pillar and slot number
    async fn list_by_station(
        &self,
        station_id: i32,
        status: Option<SlotStatus>,
    ) -> DomainResult<Vec<PillarSlot>>;

    async fn count_by_status(&self, station_id: i32, status: SlotStatus) -> DomainResult<u64>;

    async fn update(&self, slot: PillarSlot) -> DomainResult<PillarSlot>;

    /// Lock `count` ready slots of a station for an appointment.
    ///
    /// Picks `Unavailable` slots ordered by pillar, then slot number, both
    /// descending, and commits them in one transaction. Returns the locked
    /// slots, or an empty list (and no change) when fewer than `count`
    /// slots are ready.
    async fn lock_slots(
        &self,
        station_id: i32,
        count: u32,
        appointment_id: i32,
    ) -> DomainResult<Vec<PillarSlot>>;

    /// Return every `Lock` slot tied to the appointment to `Unavailable`
    /// and clear the link. Returns the number of slots released.
    async fn unlock_by_appointment(&self, appointment_id: i32) -> DomainResult<u64>;
}
