//! Unit of work for the domain layer

use super::appointment::AppointmentRepository;
use super::battery::BatteryRepository;
use super::plan::PlanRepository;
use super::station::{PillarRepository, PillarSlotRepository, StationRepository};
use super::subscription::SubscriptionRepository;
use super::swap::BatterySwapRepository;
use super::transaction::TransactionRepository;
use super::user::UserRepository;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let sub = repos.subscriptions().find_by_id(7).await?;
///     let slots = repos.slots().find_by_appointment(42).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn stations(&self) -> &dyn StationRepository;
    fn pillars(&self) -> &dyn PillarRepository;
    fn slots(&self) -> &dyn PillarSlotRepository;
    fn batteries(&self) -> &dyn BatteryRepository;
    fn plans(&self) -> &dyn PlanRepository;
    fn subscriptions(&self) -> &dyn SubscriptionRepository;
    fn appointments(&self) -> &dyn AppointmentRepository;
    fn transactions(&self) -> &dyn TransactionRepository;
    fn swaps(&self) -> &dyn BatterySwapRepository;
}
