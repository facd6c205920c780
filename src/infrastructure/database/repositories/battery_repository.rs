//! SeaORM implementation of BatteryRepository

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::domain::battery::{Battery, BatteryQuery, BatteryRepository, BatteryStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::battery;
use crate::shared::PaginatedResult;

pub struct SeaOrmBatteryRepository {
    db: DatabaseConnection,
}

impl SeaOrmBatteryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: battery::Model) -> Battery {
    Battery {
        id: m.id,
        model: m.model,
        capacity_kwh: m.capacity_kwh,
        state_of_charge: m.state_of_charge,
        state_of_health: m.state_of_health,
        status: BatteryStatus::from(m.status.as_str()),
        station_id: m.station_id,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

#[async_trait]
impl BatteryRepository for SeaOrmBatteryRepository {
    async fn create(&self, b: Battery) -> DomainResult<Battery> {
        debug!("Registering battery: {}", b.id);
        let model = battery::ActiveModel {
            id: Set(b.id),
            model: Set(b.model),
            capacity_kwh: Set(b.capacity_kwh),
            state_of_charge: Set(b.state_of_charge),
            state_of_health: Set(b.state_of_health),
            status: Set(b.status.as_str().to_string()),
            station_id: Set(b.station_id),
            created_at: Set(b.created_at),
            updated_at: Set(b.updated_at),
        }
        .insert(&self.db)
        .await?;
        Ok(model_to_domain(model))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Battery>> {
        let model = battery::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn list(&self, q: BatteryQuery) -> DomainResult<PaginatedResult<Battery>> {
        let mut query = battery::Entity::find();
        if let Some(station_id) = q.station_id {
            query = query.filter(battery::Column::StationId.eq(station_id));
        }
        if let Some(status) = q.status {
            query = query.filter(battery::Column::Status.eq(status.as_str()));
        }

        let total = query.clone().count(&self.db).await?;
        let models = query
            .order_by_asc(battery::Column::Id)
            .offset(q.pagination.offset())
            .limit(q.pagination.limit as u64)
            .all(&self.db)
            .await?;

        Ok(PaginatedResult::new(
            models.into_iter().map(model_to_domain).collect(),
            total,
            q.pagination.page,
            q.pagination.limit,
        ))
    }

    async fn update(&self, b: Battery) -> DomainResult<Battery> {
        debug!("Updating battery {} -> {}", b.id, b.status);
        let Some(existing) = battery::Entity::find_by_id(b.id.as_str())
            .one(&self.db)
            .await?
        else {
            return Err(DomainError::not_found("Battery", "id", &b.id));
        };

        let mut active: battery::ActiveModel = existing.into();
        active.model = Set(b.model);
        active.capacity_kwh = Set(b.capacity_kwh);
        active.state_of_charge = Set(b.state_of_charge);
        active.state_of_health = Set(b.state_of_health);
        active.status = Set(b.status.as_str().to_string());
        active.station_id = Set(b.station_id);
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;
        Ok(model_to_domain(model))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = battery::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Battery", "id", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_connection;

    #[tokio::test]
    async fn list_filters_by_status() {
        let repo = SeaOrmBatteryRepository::new(test_connection().await);
        repo.create(Battery::new("BAT-1", "LFP-48V", 2.4)).await.unwrap();
        let mut worn = Battery::new("BAT-2", "LFP-48V", 2.4);
        worn.status = BatteryStatus::Maintenance;
        repo.create(worn).await.unwrap();

        let ready = repo
            .list(BatteryQuery {
                status: Some(BatteryStatus::Ready),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(ready.total, 1);
        assert_eq!(ready.items[0].id, "BAT-1");
    }

    #[tokio::test]
    async fn update_persists_station_and_status() {
        let repo = SeaOrmBatteryRepository::new(test_connection().await);
        let mut b = repo.create(Battery::new("BAT-1", "LFP-48V", 2.4)).await.unwrap();
        b.return_to(3);
        repo.update(b).await.unwrap();

        let reloaded = repo.find_by_id("BAT-1").await.unwrap().unwrap();
        assert_eq!(reloaded.status, BatteryStatus::Charging);
        assert_eq!(reloaded.station_id, Some(3));
    }
}
