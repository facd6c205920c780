//! SeaORM implementations of StationRepository and PillarRepository

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::domain::station::{Pillar, PillarRepository, Station, StationQuery, StationRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{pillar, station};
use crate::shared::PaginatedResult;

// ── Conversion helpers ──────────────────────────────────────────

fn station_to_domain(m: station::Model) -> Station {
    Station {
        id: m.id,
        name: m.name,
        address: m.address,
        latitude: m.latitude,
        longitude: m.longitude,
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn pillar_to_domain(m: pillar::Model) -> Pillar {
    Pillar {
        id: m.id,
        station_id: m.station_id,
        code: m.code,
        created_at: m.created_at,
    }
}

// ── Stations ────────────────────────────────────────────────────

pub struct SeaOrmStationRepository {
    db: DatabaseConnection,
}

impl SeaOrmStationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StationRepository for SeaOrmStationRepository {
    async fn create(&self, s: Station) -> DomainResult<Station> {
        debug!("Creating station: {}", s.name);
        let model = station::ActiveModel {
            id: NotSet,
            name: Set(s.name),
            address: Set(s.address),
            latitude: Set(s.latitude),
            longitude: Set(s.longitude),
            is_active: Set(s.is_active),
            created_at: Set(s.created_at),
            updated_at: Set(s.updated_at),
        }
        .insert(&self.db)
        .await?;
        Ok(station_to_domain(model))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Station>> {
        let model = station::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(station_to_domain))
    }

    async fn list(&self, q: StationQuery) -> DomainResult<PaginatedResult<Station>> {
        let mut query = station::Entity::find();

        if let Some(ref search) = q.search {
            query = query.filter(
                Condition::any()
                    .add(station::Column::Name.contains(search))
                    .add(station::Column::Address.contains(search)),
            );
        }
        if q.active_only {
            query = query.filter(station::Column::IsActive.eq(true));
        }

        let total = query.clone().count(&self.db).await?;
        let models = query
            .order_by_asc(station::Column::Id)
            .offset(q.pagination.offset())
            .limit(q.pagination.limit as u64)
            .all(&self.db)
            .await?;

        Ok(PaginatedResult::new(
            models.into_iter().map(station_to_domain).collect(),
            total,
            q.pagination.page,
            q.pagination.limit,
        ))
    }

    async fn update(&self, s: Station) -> DomainResult<Station> {
        debug!("Updating station: {}", s.id);
        let Some(existing) = station::Entity::find_by_id(s.id).one(&self.db).await? else {
            return Err(DomainError::not_found("Station", "id", s.id));
        };

        let mut active: station::ActiveModel = existing.into();
        active.name = Set(s.name);
        active.address = Set(s.address);
        active.latitude = Set(s.latitude);
        active.longitude = Set(s.longitude);
        active.is_active = Set(s.is_active);
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;
        Ok(station_to_domain(model))
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        debug!("Deleting station: {}", id);
        let result = station::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Station", "id", id));
        }
        Ok(())
    }
}

// ── Pillars ─────────────────────────────────────────────────────

pub struct SeaOrmPillarRepository {
    db: DatabaseConnection,
}

impl SeaOrmPillarRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PillarRepository for SeaOrmPillarRepository {
    async fn create(&self, p: Pillar) -> DomainResult<Pillar> {
        debug!("Creating pillar {} at station {}", p.code, p.station_id);
        let model = pillar::ActiveModel {
            id: NotSet,
            station_id: Set(p.station_id),
            code: Set(p.code),
            created_at: Set(p.created_at),
        }
        .insert(&self.db)
        .await?;
        Ok(pillar_to_domain(model))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Pillar>> {
        let model = pillar::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(pillar_to_domain))
    }

    async fn list_by_station(&self, station_id: i32) -> DomainResult<Vec<Pillar>> {
        let models = pillar::Entity::find()
            .filter(pillar::Column::StationId.eq(station_id))
            .order_by_asc(pillar::Column::Code)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(pillar_to_domain).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_connection;

    #[tokio::test]
    async fn list_hides_inactive_when_requested() {
        let repo = SeaOrmStationRepository::new(test_connection().await);
        repo.create(Station::new("Central", "1 Main St", 10.77, 106.70))
            .await
            .unwrap();
        let mut closed = repo
            .create(Station::new("Harbour", "9 Dock Rd", 10.76, 106.71))
            .await
            .unwrap();
        closed.is_active = false;
        repo.update(closed).await.unwrap();

        let all = repo.list(StationQuery::default()).await.unwrap();
        assert_eq!(all.total, 2);

        let active = repo
            .list(StationQuery {
                active_only: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(active.total, 1);
        assert_eq!(active.items[0].name, "Central");
    }

    #[tokio::test]
    async fn duplicate_pillar_code_is_conflict() {
        let db = test_connection().await;
        let stations = SeaOrmStationRepository::new(db.clone());
        let pillars = SeaOrmPillarRepository::new(db);
        let station = stations
            .create(Station::new("Central", "1 Main St", 0.0, 0.0))
            .await
            .unwrap();

        pillars.create(Pillar::new(station.id, "P1")).await.unwrap();
        let err = pillars
            .create(Pillar::new(station.id, "P1"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_missing_station_is_not_found() {
        let repo = SeaOrmStationRepository::new(test_connection().await);
        let err = repo.delete(99).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
