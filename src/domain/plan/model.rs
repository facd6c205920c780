//! Plan domain entity

use chrono::{DateTime, Duration, Utc};

/// Purchasable swap package
#[derive(Debug, Clone)]
pub struct Plan {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Price in the smallest currency unit
    pub price: i64,
    /// Currency code (ISO 4217)
    pub currency: String,
    pub duration_days: i32,
    /// Swaps included in one subscription period
    pub swap_limit: i32,
    /// Batteries handed out per swap (= slots locked per booking)
    pub battery_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Plan {
    pub fn new(
        name: impl Into<String>,
        price: i64,
        currency: impl Into<String>,
        duration_days: i32,
        swap_limit: i32,
        battery_count: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: name.into(),
            description: None,
            price,
            currency: currency.into(),
            duration_days,
            swap_limit,
            battery_count,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// End of a subscription period that starts at `start`
    pub fn period_end(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        start + Duration::days(self.duration_days as i64)
    }

    /// Check plan invariants, returning a human-readable reason on failure
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Plan name must not be empty".into());
        }
        if self.price < 0 {
            return Err("Price must not be negative".into());
        }
        if self.duration_days < 1 {
            return Err("duration_days must be at least 1".into());
        }
        if self.swap_limit < 1 {
            return Err("swap_limit must be at least 1".into());
        }
        if self.battery_count < 1 {
            return Err("battery_count must be at least 1".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_end_adds_duration() {
        let plan = Plan::new("Monthly", 300_000, "VND", 30, 20, 2);
        let start = Utc::now();
        assert_eq!(plan.period_end(start) - start, Duration::days(30));
    }

    #[test]
    fn validate_rejects_zero_batteries() {
        let mut plan = Plan::new("Broken", 1000, "VND", 30, 10, 1);
        assert!(plan.validate().is_ok());
        plan.battery_count = 0;
        assert!(plan.validate().is_err());
    }

    #[test]
    fn validate_rejects_negative_price() {
        let plan = Plan::new("Negative", -1, "VND", 30, 10, 1);
        assert!(plan.validate().is_err());
    }
}
