//! Shared fixtures for service tests

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    Battery, Pillar, PillarSlot, Plan, RepositoryProvider, Station, Subscription, User, UserRole,
};
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use crate::infrastructure::database::test_connection;

pub async fn repos() -> Arc<dyn RepositoryProvider> {
    Arc::new(SeaOrmRepositoryProvider::new(test_connection().await))
}

pub async fn seed_user(repos: &Arc<dyn RepositoryProvider>, username: &str, role: UserRole) -> User {
    repos
        .users()
        .create(User::new(
            username,
            format!("{username}@evswap.io"),
            "not-a-real-hash",
            role,
        ))
        .await
        .unwrap()
}

/// Station with one pillar: `ready` slots holding Ready batteries
/// (`BAT-1`..), followed by `empty` Available slots.
pub async fn seed_station(
    repos: &Arc<dyn RepositoryProvider>,
    ready: i32,
    empty: i32,
) -> (Station, Vec<PillarSlot>) {
    let station = repos
        .stations()
        .create(Station::new("Central", "1 Main St", 10.77, 106.70))
        .await
        .unwrap();
    let pillar = repos
        .pillars()
        .create(Pillar::new(station.id, "P1"))
        .await
        .unwrap();

    let mut slots = Vec::new();
    for n in 1..=ready + empty {
        let mut slot = PillarSlot::new(pillar.id, station.id, n);
        if n <= ready {
            let mut battery = Battery::new(format!("BAT-{n}"), "LFP-48V", 2.4);
            battery.station_id = Some(station.id);
            let battery = repos.batteries().create(battery).await.unwrap();
            slot.place_battery(battery.id, false);
        }
        slots.push(repos.slots().create(slot).await.unwrap());
    }
    (station, slots)
}

pub async fn seed_plan(
    repos: &Arc<dyn RepositoryProvider>,
    battery_count: i32,
    swap_limit: i32,
) -> Plan {
    repos
        .plans()
        .create(Plan::new("Basic", 200_000, "VND", 30, swap_limit, battery_count))
        .await
        .unwrap()
}

pub async fn seed_active_subscription(
    repos: &Arc<dyn RepositoryProvider>,
    user_id: &str,
    plan: &Plan,
) -> Subscription {
    let mut sub = Subscription::pending(user_id, plan.id);
    sub.activate(plan, Utc::now());
    repos.subscriptions().create(sub).await.unwrap()
}
