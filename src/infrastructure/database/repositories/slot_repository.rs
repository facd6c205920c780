//! SeaORM implementation of PillarSlotRepository
//!
//! Slot locking runs inside a database transaction: candidates are selected
//! and flipped to `Lock` with a status guard, and the whole batch is rolled
//! back unless every requested slot was taken.

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::domain::station::{PillarSlot, PillarSlotRepository, SlotStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::pillar_slot;

pub struct SeaOrmPillarSlotRepository {
    db: DatabaseConnection,
}

impl SeaOrmPillarSlotRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: pillar_slot::Model) -> PillarSlot {
    PillarSlot {
        id: m.id,
        pillar_id: m.pillar_id,
        station_id: m.station_id,
        slot_number: m.slot_number,
        status: SlotStatus::from(m.status.as_str()),
        battery_id: m.battery_id,
        appointment_id: m.appointment_id,
        updated_at: m.updated_at,
    }
}

fn battery_conflict(e: sea_orm::DbErr) -> DomainError {
    let msg = e.to_string();
    if msg.contains("UNIQUE") || msg.contains("duplicate") {
        DomainError::Conflict("Battery already occupies another slot".to_string())
    } else {
        DomainError::Database(msg)
    }
}

#[async_trait]
impl PillarSlotRepository for SeaOrmPillarSlotRepository {
    async fn create(&self, s: PillarSlot) -> DomainResult<PillarSlot> {
        let model = pillar_slot::ActiveModel {
            id: NotSet,
            pillar_id: Set(s.pillar_id),
            station_id: Set(s.station_id),
            slot_number: Set(s.slot_number),
            status: Set(s.status.as_str().to_string()),
            battery_id: Set(s.battery_id),
            appointment_id: Set(s.appointment_id),
            updated_at: Set(s.updated_at),
        }
        .insert(&self.db)
        .await
        .map_err(battery_conflict)?;
        Ok(model_to_domain(model))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<PillarSlot>> {
        let model = pillar_slot::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_battery_id(&self, battery_id: &str) -> DomainResult<Option<PillarSlot>> {
        let model = pillar_slot::Entity::find()
            .filter(pillar_slot::Column::BatteryId.eq(battery_id))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_appointment(&self, appointment_id: i32) -> DomainResult<Vec<PillarSlot>> {
        let models = pillar_slot::Entity::find()
            .filter(pillar_slot::Column::AppointmentId.eq(appointment_id))
            .order_by_desc(pillar_slot::Column::PillarId)
            .order_by_desc(pillar_slot::Column::SlotNumber)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn list_by_station(
        &self,
        station_id: i32,
        status: Option<SlotStatus>,
    ) -> DomainResult<Vec<PillarSlot>> {
        let mut query =
            pillar_slot::Entity::find().filter(pillar_slot::Column::StationId.eq(station_id));
        if let Some(status) = status {
            query = query.filter(pillar_slot::Column::Status.eq(status.as_str()));
        }
        let models = query
            .order_by_asc(pillar_slot::Column::PillarId)
            .order_by_asc(pillar_slot::Column::SlotNumber)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn count_by_status(&self, station_id: i32, status: SlotStatus) -> DomainResult<u64> {
        Ok(pillar_slot::Entity::find()
            .filter(pillar_slot::Column::StationId.eq(station_id))
            .filter(pillar_slot::Column::Status.eq(status.as_str()))
            .count(&self.db)
            .await?)
    }

    async fn update(&self, s: PillarSlot) -> DomainResult<PillarSlot> {
        debug!("Updating slot {} -> {}", s.id, s.status);
        let Some(existing) = pillar_slot::Entity::find_by_id(s.id).one(&self.db).await? else {
            return Err(DomainError::not_found("PillarSlot", "id", s.id));
        };

        let mut active: pillar_slot::ActiveModel = existing.into();
        active.status = Set(s.status.as_str().to_string());
        active.battery_id = Set(s.battery_id);
        active.appointment_id = Set(s.appointment_id);
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await.map_err(battery_conflict)?;
        Ok(model_to_domain(model))
    }

    async fn lock_slots(
        &self,
        station_id: i32,
        count: u32,
        appointment_id: i32,
    ) -> DomainResult<Vec<PillarSlot>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let txn = self.db.begin().await?;

        let candidates = pillar_slot::Entity::find()
            .filter(pillar_slot::Column::StationId.eq(station_id))
            .filter(pillar_slot::Column::Status.eq(SlotStatus::Unavailable.as_str()))
            .order_by_desc(pillar_slot::Column::PillarId)
            .order_by_desc(pillar_slot::Column::SlotNumber)
            .limit(count as u64)
            .all(&txn)
            .await?;

        if candidates.len() < count as usize {
            debug!(
                "Station {} has {} ready slots, {} requested",
                station_id,
                candidates.len(),
                count
            );
            txn.rollback().await?;
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = candidates.iter().map(|m| m.id).collect();
        let result = pillar_slot::Entity::update_many()
            .col_expr(
                pillar_slot::Column::Status,
                Expr::value(SlotStatus::Lock.as_str()),
            )
            .col_expr(pillar_slot::Column::AppointmentId, Expr::value(appointment_id))
            .col_expr(pillar_slot::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(pillar_slot::Column::Id.is_in(ids.clone()))
            .filter(pillar_slot::Column::Status.eq(SlotStatus::Unavailable.as_str()))
            .exec(&txn)
            .await?;

        // Another writer took one of the candidates between select and update
        if result.rows_affected != ids.len() as u64 {
            txn.rollback().await?;
            return Ok(Vec::new());
        }

        let locked = pillar_slot::Entity::find()
            .filter(pillar_slot::Column::Id.is_in(ids))
            .order_by_desc(pillar_slot::Column::PillarId)
            .order_by_desc(pillar_slot::Column::SlotNumber)
            .all(&txn)
            .await?;
        txn.commit().await?;

        debug!(
            "Locked {} slots at station {} for appointment {}",
            locked.len(),
            station_id,
            appointment_id
        );
        Ok(locked.into_iter().map(model_to_domain).collect())
    }

    async fn unlock_by_appointment(&self, appointment_id: i32) -> DomainResult<u64> {
        let result = pillar_slot::Entity::update_many()
            .col_expr(
                pillar_slot::Column::Status,
                Expr::value(SlotStatus::Unavailable.as_str()),
            )
            .col_expr(
                pillar_slot::Column::AppointmentId,
                Expr::value(Option::<i32>::None),
            )
            .col_expr(pillar_slot::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(pillar_slot::Column::AppointmentId.eq(appointment_id))
            .filter(pillar_slot::Column::Status.eq(SlotStatus::Lock.as_str()))
            .exec(&self.db)
            .await?;

        debug!(
            "Unlocked {} slots for appointment {}",
            result.rows_affected, appointment_id
        );
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::station::{Pillar, PillarRepository, Station, StationRepository};
    use crate::infrastructure::database::repositories::station_repository::{
        SeaOrmPillarRepository, SeaOrmStationRepository,
    };
    use crate::infrastructure::database::test_connection;

    /// Station with one pillar and `ready` slots holding batteries, plus one empty slot.
    async fn seed(ready: i32) -> (SeaOrmPillarSlotRepository, i32, i32) {
        let db = test_connection().await;
        let station = SeaOrmStationRepository::new(db.clone())
            .create(Station::new("Central", "1 Main St", 0.0, 0.0))
            .await
            .unwrap();
        let pillar = SeaOrmPillarRepository::new(db.clone())
            .create(Pillar::new(station.id, "P1"))
            .await
            .unwrap();

        let slots = SeaOrmPillarSlotRepository::new(db);
        for n in 1..=ready {
            let mut slot = PillarSlot::new(pillar.id, station.id, n);
            slot.place_battery(format!("BAT-{n}"), false);
            slots.create(slot).await.unwrap();
        }
        slots
            .create(PillarSlot::new(pillar.id, station.id, ready + 1))
            .await
            .unwrap();
        (slots, station.id, pillar.id)
    }

    #[tokio::test]
    async fn locks_highest_ordered_ready_slots() {
        let (slots, station_id, _) = seed(4).await;

        let locked = slots.lock_slots(station_id, 2, 7).await.unwrap();
        let numbers: Vec<i32> = locked.iter().map(|s| s.slot_number).collect();
        assert_eq!(numbers, vec![4, 3]);
        assert!(locked
            .iter()
            .all(|s| s.status == SlotStatus::Lock && s.appointment_id == Some(7)));

        assert_eq!(
            slots
                .count_by_status(station_id, SlotStatus::Unavailable)
                .await
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn orders_by_pillar_before_slot_number() {
        let (slots, station_id, first_pillar) = seed(2).await;
        let db = slots.db.clone();
        let second = SeaOrmPillarRepository::new(db)
            .create(Pillar::new(station_id, "P2"))
            .await
            .unwrap();
        assert!(second.id > first_pillar);

        let mut slot = PillarSlot::new(second.id, station_id, 1);
        slot.place_battery("BAT-X", false);
        slots.create(slot).await.unwrap();

        let locked = slots.lock_slots(station_id, 2, 1).await.unwrap();
        assert_eq!(locked[0].pillar_id, second.id);
        assert_eq!(locked[1].pillar_id, first_pillar);
        assert_eq!(locked[1].slot_number, 2);
    }

    #[tokio::test]
    async fn insufficient_slots_touch_nothing() {
        let (slots, station_id, _) = seed(1).await;

        let locked = slots.lock_slots(station_id, 2, 9).await.unwrap();
        assert!(locked.is_empty());
        assert_eq!(
            slots.count_by_status(station_id, SlotStatus::Lock).await.unwrap(),
            0
        );
        assert!(slots.find_by_appointment(9).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unlock_releases_only_that_appointment() {
        let (slots, station_id, _) = seed(4).await;
        slots.lock_slots(station_id, 2, 1).await.unwrap();
        slots.lock_slots(station_id, 2, 2).await.unwrap();

        assert_eq!(slots.unlock_by_appointment(1).await.unwrap(), 2);
        assert!(slots.find_by_appointment(1).await.unwrap().is_empty());

        let other = slots.find_by_appointment(2).await.unwrap();
        assert_eq!(other.len(), 2);
        assert!(other.iter().all(|s| s.status == SlotStatus::Lock));

        // Second run finds nothing to release
        assert_eq!(slots.unlock_by_appointment(1).await.unwrap(), 0);
        assert_eq!(
            slots
                .count_by_status(station_id, SlotStatus::Unavailable)
                .await
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn battery_cannot_sit_in_two_slots() {
        let (slots, station_id, pillar_id) = seed(1).await;
        let mut dup = PillarSlot::new(pillar_id, station_id, 10);
        dup.place_battery("BAT-1", false);

        let err = slots.create(dup).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
