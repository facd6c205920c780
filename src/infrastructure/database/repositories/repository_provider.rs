//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::appointment::AppointmentRepository;
use crate::domain::battery::BatteryRepository;
use crate::domain::plan::PlanRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::station::{PillarRepository, PillarSlotRepository, StationRepository};
use crate::domain::subscription::SubscriptionRepository;
use crate::domain::swap::BatterySwapRepository;
use crate::domain::transaction::TransactionRepository;
use crate::domain::user::UserRepository;

use super::appointment_repository::SeaOrmAppointmentRepository;
use super::battery_repository::SeaOrmBatteryRepository;
use super::plan_repository::SeaOrmPlanRepository;
use super::slot_repository::SeaOrmPillarSlotRepository;
use super::station_repository::{SeaOrmPillarRepository, SeaOrmStationRepository};
use super::subscription_repository::SeaOrmSubscriptionRepository;
use super::swap_repository::SeaOrmBatterySwapRepository;
use super::transaction_repository::SeaOrmTransactionRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let plan = repos.plans().find_by_id(1).await?;
/// let locked = repos.slots().lock_slots(station_id, 2, appointment_id).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    stations: SeaOrmStationRepository,
    pillars: SeaOrmPillarRepository,
    slots: SeaOrmPillarSlotRepository,
    batteries: SeaOrmBatteryRepository,
    plans: SeaOrmPlanRepository,
    subscriptions: SeaOrmSubscriptionRepository,
    appointments: SeaOrmAppointmentRepository,
    transactions: SeaOrmTransactionRepository,
    swaps: SeaOrmBatterySwapRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            stations: SeaOrmStationRepository::new(db.clone()),
            pillars: SeaOrmPillarRepository::new(db.clone()),
            slots: SeaOrmPillarSlotRepository::new(db.clone()),
            batteries: SeaOrmBatteryRepository::new(db.clone()),
            plans: SeaOrmPlanRepository::new(db.clone()),
            subscriptions: SeaOrmSubscriptionRepository::new(db.clone()),
            appointments: SeaOrmAppointmentRepository::new(db.clone()),
            transactions: SeaOrmTransactionRepository::new(db.clone()),
            swaps: SeaOrmBatterySwapRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn stations(&self) -> &dyn StationRepository {
        &self.stations
    }

    fn pillars(&self) -> &dyn PillarRepository {
        &self.pillars
    }

    fn slots(&self) -> &dyn PillarSlotRepository {
        &self.slots
    }

    fn batteries(&self) -> &dyn BatteryRepository {
        &self.batteries
    }

    fn plans(&self) -> &dyn PlanRepository {
        &self.plans
    }

    fn subscriptions(&self) -> &dyn SubscriptionRepository {
        &self.subscriptions
    }

    fn appointments(&self) -> &dyn AppointmentRepository {
        &self.appointments
    }

    fn transactions(&self) -> &dyn TransactionRepository {
        &self.transactions
    }

    fn swaps(&self) -> &dyn BatterySwapRepository {
        &self.swaps
    }
}
