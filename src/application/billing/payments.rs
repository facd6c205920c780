//! Checkout and payment gateway callbacks

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use url::Url;

use crate::domain::{
    DomainError, DomainResult, RepositoryProvider, Subscription, SubscriptionStatus, Transaction,
};
use crate::infrastructure::crypto::payment_signature::{sign_params, verify_params};
use crate::shared::{PaginatedResult, PaginationParams};

/// Gateway response code for an approved payment
pub const RESPONSE_CODE_SUCCESS: &str = "00";

/// Payment gateway settings
#[derive(Debug, Clone)]
pub struct PaymentGatewayConfig {
    pub gateway_url: String,
    pub merchant_code: String,
    pub secret: String,
    /// Where the gateway sends the driver's browser after payment
    pub return_url: String,
}

/// What the driver needs to go and pay
#[derive(Debug, Clone)]
pub struct CheckoutResult {
    pub transaction: Transaction,
    pub subscription: Subscription,
    pub payment_url: String,
}

pub struct PaymentService {
    repos: Arc<dyn RepositoryProvider>,
    config: PaymentGatewayConfig,
}

fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

impl PaymentService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, config: PaymentGatewayConfig) -> Self {
        Self { repos, config }
    }

    /// Start buying a plan: pending subscription + pending transaction +
    /// signed gateway redirect.
    pub async fn checkout(&self, user_id: &str, plan_id: i32) -> DomainResult<CheckoutResult> {
        let plan = self
            .repos
            .plans()
            .find_by_id(plan_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Plan", "id", plan_id))?;
        if !plan.is_active {
            return Err(DomainError::Conflict(format!(
                "Plan {} is no longer offered",
                plan_id
            )));
        }

        let subscription = self
            .repos
            .subscriptions()
            .create(Subscription::pending(user_id, plan.id))
            .await?;
        let transaction = self
            .repos
            .transactions()
            .create(Transaction::pending(
                user_id,
                subscription.id,
                plan.id,
                plan.price,
                plan.currency.clone(),
            ))
            .await?;

        let payment_url = self.payment_url(&transaction, &format!("Subscription {}", plan.name))?;
        info!(
            transaction_id = %transaction.id,
            subscription_id = subscription.id,
            amount = transaction.amount,
            "Checkout started"
        );

        Ok(CheckoutResult {
            transaction,
            subscription,
            payment_url,
        })
    }

    fn payment_url(&self, transaction: &Transaction, order_info: &str) -> DomainResult<String> {
        let mut params = vec![
            ("merchant_code".to_string(), self.config.merchant_code.clone()),
            ("txn_ref".to_string(), transaction.id.clone()),
            ("amount".to_string(), transaction.amount.to_string()),
            ("currency".to_string(), transaction.currency.clone()),
            ("order_info".to_string(), order_info.to_string()),
            ("return_url".to_string(), self.config.return_url.clone()),
        ];
        let signature = sign_params(&self.config.secret, &params);
        params.push(("signature".to_string(), signature));

        let url = Url::parse_with_params(&self.config.gateway_url, &params)
            .map_err(|e| DomainError::Validation(format!("Invalid payment gateway URL: {}", e)))?;
        Ok(url.into())
    }

    /// Apply a gateway callback. Replays for a settled transaction return the
    /// stored outcome unchanged.
    pub async fn handle_callback(&self, params: Vec<(String, String)>) -> DomainResult<Transaction> {
        if !verify_params(&self.config.secret, &params) {
            warn!("Payment callback with invalid signature");
            return Err(DomainError::Validation("Invalid payment signature".into()));
        }

        let txn_ref = param(&params, "txn_ref")
            .ok_or_else(|| DomainError::Validation("Missing txn_ref".into()))?;
        let response_code = param(&params, "response_code")
            .ok_or_else(|| DomainError::Validation("Missing response_code".into()))?;
        let amount: i64 = param(&params, "amount")
            .and_then(|a| a.parse().ok())
            .ok_or_else(|| DomainError::Validation("Missing or invalid amount".into()))?;
        let transaction_no = param(&params, "transaction_no").map(str::to_string);

        let mut transaction = self
            .repos
            .transactions()
            .find_by_id(txn_ref)
            .await?
            .ok_or_else(|| DomainError::not_found("Transaction", "id", txn_ref))?;

        if transaction.is_final() {
            info!(transaction_id = %transaction.id, status = %transaction.status, "Duplicate payment callback ignored");
            return Ok(transaction);
        }
        if amount != transaction.amount {
            warn!(transaction_id = %transaction.id, expected = transaction.amount, got = amount, "Payment amount mismatch");
            return Err(DomainError::Validation("Amount mismatch".into()));
        }

        // The transaction is settled last; until then a gateway retry reapplies it.
        let success = response_code == RESPONSE_CODE_SUCCESS;
        let mut subscription = self
            .repos
            .subscriptions()
            .find_by_id(transaction.subscription_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found("Subscription", "id", transaction.subscription_id)
            })?;

        match (success, subscription.status) {
            (true, SubscriptionStatus::Pending) => {
                let plan = self
                    .repos
                    .plans()
                    .find_by_id(transaction.plan_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Plan", "id", transaction.plan_id))?;
                subscription.activate(&plan, Utc::now());
                self.repos.subscriptions().update(subscription).await?;
                metrics::counter!("payments_completed_total").increment(1);
                info!(
                    transaction_id = %transaction.id,
                    subscription_id = transaction.subscription_id,
                    "Payment succeeded, subscription activated"
                );
            }
            (true, SubscriptionStatus::Active) => {
                info!(
                    transaction_id = %transaction.id,
                    subscription_id = subscription.id,
                    "Subscription already active, settling transaction"
                );
            }
            (true, status) => {
                warn!(
                    transaction_id = %transaction.id,
                    subscription_id = subscription.id,
                    %status,
                    "Payment captured for a subscription that is no longer pending; refund required"
                );
            }
            (false, SubscriptionStatus::Pending) => {
                subscription.cancel();
                self.repos.subscriptions().update(subscription).await?;
                info!(transaction_id = %transaction.id, response_code, "Payment failed");
            }
            (false, _) => {
                info!(transaction_id = %transaction.id, response_code, "Payment failed");
            }
        }

        transaction.settle(success, response_code, transaction_no);
        let transaction = self.repos.transactions().update(transaction).await?;

        Ok(transaction)
    }

    pub async fn list_transactions(
        &self,
        user_id: Option<&str>,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<Transaction>> {
        self.repos.transactions().list(user_id, pagination).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::*;
    use crate::domain::{TransactionStatus, UserRole};

    const SECRET: &str = "gateway-secret";

    fn config() -> PaymentGatewayConfig {
        PaymentGatewayConfig {
            gateway_url: "https://pay.example.com/checkout".into(),
            merchant_code: "EVSWAP".into(),
            secret: SECRET.into(),
            return_url: "https://app.example.com/payment/return".into(),
        }
    }

    fn callback(txn_ref: &str, code: &str, amount: i64) -> Vec<(String, String)> {
        let mut params = vec![
            ("txn_ref".to_string(), txn_ref.to_string()),
            ("response_code".to_string(), code.to_string()),
            ("transaction_no".to_string(), "GW-123".to_string()),
            ("amount".to_string(), amount.to_string()),
        ];
        let sig = sign_params(SECRET, &params);
        params.push(("signature".to_string(), sig));
        params
    }

    async fn checkout() -> (Arc<dyn RepositoryProvider>, PaymentService, CheckoutResult) {
        let repos = repos().await;
        let user = seed_user(&repos, "driver1", UserRole::Driver).await;
        let plan = seed_plan(&repos, 1, 8).await;
        let svc = PaymentService::new(repos.clone(), config());
        let result = svc.checkout(&user.id, plan.id).await.unwrap();
        (repos, svc, result)
    }

    #[tokio::test]
    async fn checkout_builds_signed_gateway_url() {
        let (_, _, result) = checkout().await;
        assert_eq!(result.subscription.status, SubscriptionStatus::Pending);
        assert_eq!(result.transaction.status, TransactionStatus::Pending);

        let url = Url::parse(&result.payment_url).unwrap();
        assert_eq!(url.host_str(), Some("pay.example.com"));
        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(param(&params, "txn_ref"), Some(result.transaction.id.as_str()));
        assert_eq!(param(&params, "amount"), Some("200000"));
        assert!(verify_params(SECRET, &params));
    }

    #[tokio::test]
    async fn successful_callback_activates_subscription() {
        let (repos, svc, result) = checkout().await;
        let tx = svc
            .handle_callback(callback(&result.transaction.id, "00", 200_000))
            .await
            .unwrap();
        assert_eq!(tx.status, TransactionStatus::Success);
        assert_eq!(tx.gateway_transaction_no.as_deref(), Some("GW-123"));

        let sub = repos
            .subscriptions()
            .find_by_id(result.subscription.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.remaining_swaps, 8);
        assert!(sub.end_date.is_some());
    }

    #[tokio::test]
    async fn repeated_callback_is_idempotent() {
        let (_, svc, result) = checkout().await;
        svc.handle_callback(callback(&result.transaction.id, "00", 200_000))
            .await
            .unwrap();
        // A late failure notice must not undo the success
        let tx = svc
            .handle_callback(callback(&result.transaction.id, "24", 200_000))
            .await
            .unwrap();
        assert_eq!(tx.status, TransactionStatus::Success);
        assert_eq!(tx.gateway_response_code.as_deref(), Some("00"));
    }

    #[tokio::test]
    async fn failed_callback_cancels_pending_subscription() {
        let (repos, svc, result) = checkout().await;
        let tx = svc
            .handle_callback(callback(&result.transaction.id, "24", 200_000))
            .await
            .unwrap();
        assert_eq!(tx.status, TransactionStatus::Failed);
        let sub = repos
            .subscriptions()
            .find_by_id(result.subscription.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Cancelled);
    }

    #[tokio::test]
    async fn tampered_or_mismatched_callbacks_are_rejected() {
        let (_, svc, result) = checkout().await;

        let mut tampered = callback(&result.transaction.id, "00", 200_000);
        tampered[0].1 = "someone-elses-txn".into();
        assert!(matches!(
            svc.handle_callback(tampered).await.unwrap_err(),
            DomainError::Validation(_)
        ));

        let wrong_amount = callback(&result.transaction.id, "00", 1);
        assert!(matches!(
            svc.handle_callback(wrong_amount).await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn settlement_failure_leaves_transaction_open_for_retry() {
        let repos = repos().await;
        let user = seed_user(&repos, "driver1", UserRole::Driver).await;
        let plan = seed_plan(&repos, 1, 8).await;
        let subscription = repos
            .subscriptions()
            .create(Subscription::pending(&user.id, plan.id))
            .await
            .unwrap();
        // Points at a plan that does not exist
        let transaction = repos
            .transactions()
            .create(Transaction::pending(&user.id, subscription.id, 9_999, 200_000, "VND"))
            .await
            .unwrap();
        let svc = PaymentService::new(repos.clone(), config());

        for _ in 0..2 {
            let err = svc
                .handle_callback(callback(&transaction.id, "00", 200_000))
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::NotFound { .. }));
        }

        let stored = repos
            .transactions()
            .find_by_id(&transaction.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, TransactionStatus::Pending);
        let sub = repos
            .subscriptions()
            .find_by_id(subscription.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Pending);
    }

    #[tokio::test]
    async fn late_payment_does_not_revive_cancelled_subscription() {
        let (repos, svc, result) = checkout().await;
        let mut sub = result.subscription.clone();
        sub.cancel();
        repos.subscriptions().update(sub).await.unwrap();

        let tx = svc
            .handle_callback(callback(&result.transaction.id, "00", 200_000))
            .await
            .unwrap();
        assert_eq!(tx.status, TransactionStatus::Success);

        let sub = repos
            .subscriptions()
            .find_by_id(result.subscription.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Cancelled);
    }
}
