//! SeaORM implementation of AppointmentRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::domain::appointment::{
    Appointment, AppointmentQuery, AppointmentRepository, AppointmentStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::appointment;
use crate::shared::PaginatedResult;

pub struct SeaOrmAppointmentRepository {
    db: DatabaseConnection,
}

impl SeaOrmAppointmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: appointment::Model) -> Appointment {
    Appointment {
        id: m.id,
        user_id: m.user_id,
        subscription_id: m.subscription_id,
        station_id: m.station_id,
        scheduled_at: m.scheduled_at,
        status: AppointmentStatus::from(m.status.as_str()),
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

#[async_trait]
impl AppointmentRepository for SeaOrmAppointmentRepository {
    async fn create(&self, a: Appointment) -> DomainResult<Appointment> {
        debug!(
            "Creating appointment for user {} at station {}",
            a.user_id, a.station_id
        );
        let model = appointment::ActiveModel {
            id: NotSet,
            user_id: Set(a.user_id),
            subscription_id: Set(a.subscription_id),
            station_id: Set(a.station_id),
            scheduled_at: Set(a.scheduled_at),
            status: Set(a.status.as_str().to_string()),
            created_at: Set(a.created_at),
            updated_at: Set(a.updated_at),
        }
        .insert(&self.db)
        .await?;
        Ok(model_to_domain(model))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Appointment>> {
        let model = appointment::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn list(&self, q: AppointmentQuery) -> DomainResult<PaginatedResult<Appointment>> {
        let mut query = appointment::Entity::find();
        if let Some(ref user_id) = q.user_id {
            query = query.filter(appointment::Column::UserId.eq(user_id.as_str()));
        }
        if let Some(station_id) = q.station_id {
            query = query.filter(appointment::Column::StationId.eq(station_id));
        }
        if let Some(status) = q.status {
            query = query.filter(appointment::Column::Status.eq(status.as_str()));
        }

        let total = query.clone().count(&self.db).await?;
        let models = query
            .order_by_desc(appointment::Column::ScheduledAt)
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

    async fn find_open_for_subscription(
        &self,
        subscription_id: i32,
    ) -> DomainResult<Vec<Appointment>> {
        let models = appointment::Entity::find()
            .filter(appointment::Column::SubscriptionId.eq(subscription_id))
            .filter(appointment::Column::Status.eq(AppointmentStatus::Confirmed.as_str()))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_overdue(&self, cutoff: DateTime<Utc>) -> DomainResult<Vec<Appointment>> {
        let models = appointment::Entity::find()
            .filter(appointment::Column::Status.eq(AppointmentStatus::Confirmed.as_str()))
            .filter(appointment::Column::ScheduledAt.lt(cutoff))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, a: Appointment) -> DomainResult<Appointment> {
        debug!("Updating appointment {} -> {}", a.id, a.status);
        let Some(existing) = appointment::Entity::find_by_id(a.id).one(&self.db).await? else {
            return Err(DomainError::not_found("Appointment", "id", a.id));
        };

        let mut active: appointment::ActiveModel = existing.into();
        active.scheduled_at = Set(a.scheduled_at);
        active.status = Set(a.status.as_str().to_string());
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;
        Ok(model_to_domain(model))
    }
}
