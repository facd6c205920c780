//! SeaORM implementation of BatterySwapRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::domain::swap::{BatterySwap, BatterySwapRepository, SwapQuery};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::battery_swap;
use crate::shared::PaginatedResult;

pub struct SeaOrmBatterySwapRepository {
    db: DatabaseConnection,
}

impl SeaOrmBatterySwapRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: battery_swap::Model) -> BatterySwap {
    BatterySwap {
        id: m.id,
        appointment_id: m.appointment_id,
        station_id: m.station_id,
        user_id: m.user_id,
        slot_id: m.slot_id,
        battery_out_id: m.battery_out_id,
        battery_in_id: m.battery_in_id,
        swapped_at: m.swapped_at,
    }
}

#[async_trait]
impl BatterySwapRepository for SeaOrmBatterySwapRepository {
    async fn create(&self, s: BatterySwap) -> DomainResult<BatterySwap> {
        let model = battery_swap::ActiveModel {
            id: NotSet,
            appointment_id: Set(s.appointment_id),
            station_id: Set(s.station_id),
            user_id: Set(s.user_id),
            slot_id: Set(s.slot_id),
            battery_out_id: Set(s.battery_out_id),
            battery_in_id: Set(s.battery_in_id),
            swapped_at: Set(s.swapped_at),
        }
        .insert(&self.db)
        .await?;
        Ok(model_to_domain(model))
    }

    async fn list(&self, q: SwapQuery) -> DomainResult<PaginatedResult<BatterySwap>> {
        let mut query = battery_swap::Entity::find();
        if let Some(ref user_id) = q.user_id {
            query = query.filter(battery_swap::Column::UserId.eq(user_id.as_str()));
        }
        if let Some(station_id) = q.station_id {
            query = query.filter(battery_swap::Column::StationId.eq(station_id));
        }

        let total = query.clone().count(&self.db).await?;
        let models = query
            .order_by_desc(battery_swap::Column::SwappedAt)
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
}
