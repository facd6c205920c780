use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{Appointment, AppointmentQuery};
use crate::shared::{DomainResult, PaginatedResult};

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create(&self, appointment: Appointment) -> DomainResult<Appointment>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Appointment>>;
    async fn list(&self, query: AppointmentQuery) -> DomainResult<PaginatedResult<Appointment>>;

    /// Confirmed appointments of a subscription
    async fn find_open_for_subscription(&self, subscription_id: i32) -> DomainResult<Vec<Appointment>>;

    /// Confirmed appointments scheduled before `cutoff`
    async fn find_overdue(&self, cutoff: DateTime<Utc>) -> DomainResult<Vec<Appointment>>;

    async fn update(&self, appointment: Appointment) -> DomainResult<Appointment>;
}
