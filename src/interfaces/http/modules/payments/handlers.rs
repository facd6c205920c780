//! Payment API handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::*;
use crate::application::PaymentService;
use crate::interfaces::http::common::{
    domain_error, ApiError, ApiResponse, ApiResult, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::shared::PaginationParams;

#[derive(Clone)]
pub struct PaymentHandlerState {
    pub payments: Arc<PaymentService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/checkout",
    tag = "Payments",
    security(("bearer_auth" = [])),
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Pending subscription and transaction created", body = ApiResponse<CheckoutResponse>),
        (status = 404, description = "Plan not found"),
        (status = 409, description = "Plan is not on sale")
    )
)]
pub async fn checkout(
    State(state): State<PaymentHandlerState>,
    Extension(auth): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CheckoutRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CheckoutResponse>>), ApiError> {
    let result = state
        .payments
        .checkout(&auth.user_id, request.plan_id)
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(result.into()))))
}

/// Server-to-server notification from the payment gateway.
///
/// Query: `txn_ref`, `response_code`, `transaction_no`, `amount`, `signature`.
#[utoipa::path(
    get,
    path = "/api/v1/payments/callback",
    tag = "Payments",
    params(
        ("txn_ref" = String, Query, description = "Transaction id issued at checkout"),
        ("response_code" = String, Query, description = "`00` means approved"),
        ("transaction_no" = Option<String>, Query, description = "Gateway-side transaction number"),
        ("amount" = i64, Query, description = "Amount in minor units"),
        ("signature" = String, Query, description = "hex(sha256(secret || sorted query))")
    ),
    responses(
        (status = 200, description = "Settled transaction", body = ApiResponse<TransactionDto>),
        (status = 400, description = "Bad signature, missing parameter or amount mismatch"),
        (status = 404, description = "Unknown txn_ref")
    )
)]
pub async fn payment_callback(
    State(state): State<PaymentHandlerState>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<TransactionDto> {
    let transaction = state
        .payments
        .handle_callback(params)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(transaction.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/transactions/me",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(ListTransactionsParams),
    responses(
        (status = 200, description = "Caller's transactions", body = ApiResponse<PaginatedResponse<TransactionDto>>)
    )
)]
pub async fn my_transactions(
    State(state): State<PaymentHandlerState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(params): Query<ListTransactionsParams>,
) -> ApiResult<PaginatedResponse<TransactionDto>> {
    let result = state
        .payments
        .list_transactions(
            Some(&auth.user_id),
            PaginationParams::new(params.page, params.limit),
        )
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(result))))
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/transactions",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(ListTransactionsParams),
    responses(
        (status = 200, description = "All transactions", body = ApiResponse<PaginatedResponse<TransactionDto>>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_transactions(
    State(state): State<PaymentHandlerState>,
    Query(params): Query<ListTransactionsParams>,
) -> ApiResult<PaginatedResponse<TransactionDto>> {
    let result = state
        .payments
        .list_transactions(
            params.user_id.as_deref(),
            PaginationParams::new(params.page, params.limit),
        )
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(result))))
}
