//! Payment transaction domain entity

use chrono::{DateTime, Utc};

/// Payment outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Success => "Success",
            Self::Failed => "Failed",
        }
    }
}

impl From<&str> for TransactionStatus {
    fn from(s: &str) -> Self {
        match s {
            "Pending" => Self::Pending,
            "Success" => Self::Success,
            _ => Self::Failed,
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment attempt for a plan
#[derive(Debug, Clone)]
pub struct Transaction {
    /// UUID, also sent to the gateway as the transaction reference
    pub id: String,
    pub user_id: String,
    pub subscription_id: i32,
    pub plan_id: i32,
    /// Amount in the smallest currency unit
    pub amount: i64,
    pub currency: String,
    pub status: TransactionStatus,
    pub gateway_response_code: Option<String>,
    pub gateway_transaction_no: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn pending(
        user_id: impl Into<String>,
        subscription_id: i32,
        plan_id: i32,
        amount: i64,
        currency: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            subscription_id,
            plan_id,
            amount,
            currency: currency.into(),
            status: TransactionStatus::Pending,
            gateway_response_code: None,
            gateway_transaction_no: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_final(&self) -> bool {
        self.status != TransactionStatus::Pending
    }

    /// Record the gateway's verdict
    pub fn settle(&mut self, success: bool, response_code: &str, transaction_no: Option<String>) {
        self.status = if success {
            TransactionStatus::Success
        } else {
            TransactionStatus::Failed
        };
        self.gateway_response_code = Some(response_code.to_string());
        self.gateway_transaction_no = transaction_no;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settle_marks_final() {
        let mut tx = Transaction::pending("u1", 1, 1, 50_000, "VND");
        assert!(!tx.is_final());
        tx.settle(true, "00", Some("GW-1".into()));
        assert!(tx.is_final());
        assert_eq!(tx.status, TransactionStatus::Success);
        assert_eq!(tx.gateway_response_code.as_deref(), Some("00"));
    }

    #[test]
    fn failed_settlement() {
        let mut tx = Transaction::pending("u1", 1, 1, 50_000, "VND");
        tx.settle(false, "24", None);
        assert_eq!(tx.status, TransactionStatus::Failed);
    }
}
