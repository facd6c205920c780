//! Subscription API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use super::dto::*;
use crate::application::SubscriptionService;
use crate::interfaces::http::common::{domain_error, ApiResponse, ApiResult, PaginatedResponse};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::shared::PaginationParams;

#[derive(Clone)]
pub struct SubscriptionHandlerState {
    pub subscriptions: Arc<SubscriptionService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/me",
    tag = "Subscriptions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's subscriptions, newest first", body = ApiResponse<Vec<SubscriptionDto>>)
    )
)]
pub async fn my_subscriptions(
    State(state): State<SubscriptionHandlerState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<SubscriptionDto>> {
    let subscriptions = state
        .subscriptions
        .list_for_user(&auth.user_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        subscriptions.into_iter().map(SubscriptionDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/subscriptions",
    tag = "Subscriptions",
    security(("bearer_auth" = [])),
    params(ListSubscriptionsParams),
    responses(
        (status = 200, description = "All subscriptions", body = ApiResponse<PaginatedResponse<SubscriptionDto>>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_subscriptions(
    State(state): State<SubscriptionHandlerState>,
    Query(params): Query<ListSubscriptionsParams>,
) -> ApiResult<PaginatedResponse<SubscriptionDto>> {
    let status = params
        .status
        .as_deref()
        .map(parse_subscription_status)
        .transpose()?;
    let result = state
        .subscriptions
        .list(status, PaginationParams::new(params.page, params.limit))
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(result))))
}

#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/{id}",
    tag = "Subscriptions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Subscription ID")),
    responses(
        (status = 200, description = "Subscription details", body = ApiResponse<SubscriptionDto>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_subscription(
    State(state): State<SubscriptionHandlerState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> ApiResult<SubscriptionDto> {
    let subscription = state
        .subscriptions
        .get(id, &auth.actor())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(subscription.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/subscriptions/{id}/cancel",
    tag = "Subscriptions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Subscription ID")),
    responses(
        (status = 200, description = "Cancelled; open bookings released", body = ApiResponse<SubscriptionDto>),
        (status = 409, description = "Already expired or cancelled")
    )
)]
pub async fn cancel_subscription(
    State(state): State<SubscriptionHandlerState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> ApiResult<SubscriptionDto> {
    let subscription = state
        .subscriptions
        .cancel(id, &auth.actor())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(subscription.into())))
}
