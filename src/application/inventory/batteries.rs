//! Battery registry

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::{
    Battery, BatteryQuery, BatteryStatus, DomainError, DomainResult, RepositoryProvider,
};
use crate::shared::PaginatedResult;

/// Editable battery fields; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct BatteryChanges {
    pub model: Option<String>,
    pub capacity_kwh: Option<f64>,
    pub state_of_charge: Option<i32>,
    pub state_of_health: Option<i32>,
    pub status: Option<BatteryStatus>,
}

pub struct BatteryService {
    repos: Arc<dyn RepositoryProvider>,
}

fn check_levels(battery: &Battery) -> DomainResult<()> {
    if !(0..=100).contains(&battery.state_of_charge) {
        return Err(DomainError::Validation(
            "state_of_charge must be between 0 and 100".into(),
        ));
    }
    if !(0..=100).contains(&battery.state_of_health) {
        return Err(DomainError::Validation(
            "state_of_health must be between 0 and 100".into(),
        ));
    }
    if battery.capacity_kwh <= 0.0 {
        return Err(DomainError::Validation("capacity_kwh must be positive".into()));
    }
    Ok(())
}

impl BatteryService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn register(&self, battery: Battery) -> DomainResult<Battery> {
        check_levels(&battery)?;
        if self.repos.batteries().find_by_id(&battery.id).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "Battery {} already registered",
                battery.id
            )));
        }
        let battery = self.repos.batteries().create(battery).await?;
        info!(battery_id = %battery.id, model = %battery.model, "Battery registered");
        Ok(battery)
    }

    pub async fn get(&self, id: &str) -> DomainResult<Battery> {
        self.repos
            .batteries()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Battery", "id", id))
    }

    pub async fn list(&self, query: BatteryQuery) -> DomainResult<PaginatedResult<Battery>> {
        self.repos.batteries().list(query).await
    }

    pub async fn update(&self, id: &str, changes: BatteryChanges) -> DomainResult<Battery> {
        let mut battery = self.get(id).await?;
        if let Some(model) = changes.model {
            battery.model = model;
        }
        if let Some(capacity) = changes.capacity_kwh {
            battery.capacity_kwh = capacity;
        }
        if let Some(soc) = changes.state_of_charge {
            battery.state_of_charge = soc;
        }
        if let Some(soh) = changes.state_of_health {
            battery.state_of_health = soh;
        }
        if let Some(status) = changes.status {
            if status != battery.status {
                self.check_status_change(&battery, status).await?;
                battery.status = status;
            }
        }
        check_levels(&battery)?;
        battery.updated_at = Utc::now();

        let battery = self.repos.batteries().update(battery).await?;
        info!(battery_id = %battery.id, status = %battery.status, "Battery updated");
        Ok(battery)
    }

    /// A battery sitting in a slot cannot be retired or sent to maintenance.
    async fn check_status_change(&self, battery: &Battery, status: BatteryStatus) -> DomainResult<()> {
        if matches!(status, BatteryStatus::Retired | BatteryStatus::Maintenance)
            && self.repos.slots().find_by_battery_id(&battery.id).await?.is_some()
        {
            return Err(DomainError::Conflict(format!(
                "Battery {} is in a slot; remove it first",
                battery.id
            )));
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        self.get(id).await?;
        if self.repos.slots().find_by_battery_id(id).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "Battery {} is in a slot; remove it first",
                id
            )));
        }
        self.repos.batteries().delete(id).await?;
        info!(battery_id = id, "Battery deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{repos, seed_station};

    #[tokio::test]
    async fn register_rejects_out_of_range_levels() {
        let svc = BatteryService::new(repos().await);
        let mut battery = Battery::new("BAT-1", "LFP-48V", 2.4);
        battery.state_of_charge = 120;
        let err = svc.register(battery).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_serial_is_conflict() {
        let svc = BatteryService::new(repos().await);
        svc.register(Battery::new("BAT-1", "LFP-48V", 2.4))
            .await
            .unwrap();
        let err = svc
            .register(Battery::new("BAT-1", "NMC-60V", 3.0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn slotted_battery_cannot_be_deleted_or_retired() {
        let repos = repos().await;
        let svc = BatteryService::new(repos.clone());
        seed_station(&repos, 1, 0).await;

        assert!(matches!(
            svc.delete("BAT-1").await.unwrap_err(),
            DomainError::Conflict(_)
        ));
        let err = svc
            .update(
                "BAT-1",
                BatteryChanges {
                    status: Some(BatteryStatus::Retired),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_changes_charge_level() {
        let svc = BatteryService::new(repos().await);
        svc.register(Battery::new("BAT-1", "LFP-48V", 2.4))
            .await
            .unwrap();
        let battery = svc
            .update(
                "BAT-1",
                BatteryChanges {
                    state_of_charge: Some(35),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(battery.state_of_charge, 35);
    }
}
