//! Subscription domain entity

use chrono::{DateTime, Utc};

use crate::domain::plan::Plan;

/// Subscription status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionStatus {
    /// Created at checkout, waiting for payment
    Pending,
    Active,
    Expired,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Active => "Active",
            Self::Expired => "Expired",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl From<&str> for SubscriptionStatus {
    fn from(s: &str) -> Self {
        match s {
            "Pending" => Self::Pending,
            "Active" => Self::Active,
            "Expired" => Self::Expired,
            _ => Self::Cancelled,
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's service plan
#[derive(Debug, Clone)]
pub struct Subscription {
    pub id: i32,
    pub user_id: String,
    pub plan_id: i32,
    pub status: SubscriptionStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub remaining_swaps: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Pending subscription created at checkout
    pub fn pending(user_id: impl Into<String>, plan_id: i32) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            user_id: user_id.into(),
            plan_id,
            status: SubscriptionStatus::Pending,
            start_date: None,
            end_date: None,
            remaining_swaps: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Start the paid period
    pub fn activate(&mut self, plan: &Plan, now: DateTime<Utc>) {
        self.status = SubscriptionStatus::Active;
        self.start_date = Some(now);
        self.end_date = Some(plan.period_end(now));
        self.remaining_swaps = plan.swap_limit;
        self.updated_at = now;
    }

    /// Active, not past its end date, and with swaps left
    pub fn can_swap(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Active
            && self.end_date.map_or(true, |end| end > now)
            && self.remaining_swaps > 0
    }

    pub fn consume_swap(&mut self) {
        self.remaining_swaps = (self.remaining_swaps - 1).max(0);
        self.updated_at = Utc::now();
    }

    pub fn cancel(&mut self) {
        self.status = SubscriptionStatus::Cancelled;
        self.updated_at = Utc::now();
    }

    pub fn expire(&mut self) {
        self.status = SubscriptionStatus::Expired;
        self.updated_at = Utc::now();
    }

    pub fn is_cancellable(&self) -> bool {
        matches!(
            self.status,
            SubscriptionStatus::Pending | SubscriptionStatus::Active
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn plan() -> Plan {
        let mut p = Plan::new("Basic", 100_000, "VND", 30, 2, 1);
        p.id = 1;
        p
    }

    #[test]
    fn pending_cannot_swap() {
        let s = Subscription::pending("u1", 1);
        assert!(!s.can_swap(Utc::now()));
    }

    #[test]
    fn activation_grants_swaps_until_exhausted() {
        let now = Utc::now();
        let mut s = Subscription::pending("u1", 1);
        s.activate(&plan(), now);
        assert_eq!(s.status, SubscriptionStatus::Active);
        assert_eq!(s.remaining_swaps, 2);
        assert!(s.can_swap(now));

        s.consume_swap();
        s.consume_swap();
        s.consume_swap();
        assert_eq!(s.remaining_swaps, 0);
        assert!(!s.can_swap(now));
    }

    #[test]
    fn cannot_swap_after_end_date() {
        let now = Utc::now();
        let mut s = Subscription::pending("u1", 1);
        s.activate(&plan(), now);
        assert!(!s.can_swap(now + Duration::days(31)));
    }

    #[test]
    fn only_pending_or_active_is_cancellable() {
        let mut s = Subscription::pending("u1", 1);
        assert!(s.is_cancellable());
        s.cancel();
        assert!(!s.is_cancellable());
    }
}
