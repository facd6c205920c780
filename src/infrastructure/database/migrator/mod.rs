//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users;
mod m20250101_000002_create_stations;
mod m20250101_000003_create_pillars;
mod m20250101_000004_create_batteries;
mod m20250101_000005_create_pillar_slots;
mod m20250101_000006_create_plans;
mod m20250101_000007_create_subscriptions;
mod m20250101_000008_create_appointments;
mod m20250101_000009_create_transactions;
mod m20250101_000010_create_battery_swaps;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users::Migration),
            Box::new(m20250101_000002_create_stations::Migration),
            Box::new(m20250101_000003_create_pillars::Migration),
            Box::new(m20250101_000004_create_batteries::Migration),
            Box::new(m20250101_000005_create_pillar_slots::Migration),
            Box::new(m20250101_000006_create_plans::Migration),
            Box::new(m20250101_000007_create_subscriptions::Migration),
            Box::new(m20250101_000008_create_appointments::Migration),
            Box::new(m20250101_000009_create_transactions::Migration),
            Box::new(m20250101_000010_create_battery_swaps::Migration),
        ]
    }
}
