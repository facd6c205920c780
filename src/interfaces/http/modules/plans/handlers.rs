//! Plan API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::*;
use crate::application::{PlanChanges, PlanService};
use crate::domain::Plan;
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse, ApiResult, ValidatedJson};

#[derive(Clone)]
pub struct PlanHandlerState {
    pub plans: Arc<PlanService>,
    /// Used when a new plan does not name its currency
    pub default_currency: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/plans",
    tag = "Plans",
    params(ListPlansParams),
    responses(
        (status = 200, description = "Plans ordered by price", body = ApiResponse<Vec<PlanDto>>)
    )
)]
pub async fn list_plans(
    State(state): State<PlanHandlerState>,
    Query(params): Query<ListPlansParams>,
) -> ApiResult<Vec<PlanDto>> {
    let plans = state
        .plans
        .list(!params.include_inactive)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        plans.into_iter().map(PlanDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/plans/{id}",
    tag = "Plans",
    params(("id" = i32, Path, description = "Plan ID")),
    responses(
        (status = 200, description = "Plan details", body = ApiResponse<PlanDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_plan(
    State(state): State<PlanHandlerState>,
    Path(id): Path<i32>,
) -> ApiResult<PlanDto> {
    let plan = state.plans.get(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(plan.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/plans",
    tag = "Plans",
    security(("bearer_auth" = [])),
    request_body = CreatePlanRequest,
    responses(
        (status = 201, description = "Plan created", body = ApiResponse<PlanDto>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create_plan(
    State(state): State<PlanHandlerState>,
    ValidatedJson(request): ValidatedJson<CreatePlanRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PlanDto>>), ApiError> {
    let currency = request
        .currency
        .map(|c| c.to_uppercase())
        .unwrap_or_else(|| state.default_currency.clone());
    let mut plan = Plan::new(
        request.name,
        request.price,
        currency,
        request.duration_days,
        request.swap_limit,
        request.battery_count,
    );
    plan.description = request.description;

    let plan = state.plans.create(plan).await.map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(plan.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/plans/{id}",
    tag = "Plans",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Plan ID")),
    request_body = UpdatePlanRequest,
    responses(
        (status = 200, description = "Plan updated", body = ApiResponse<PlanDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_plan(
    State(state): State<PlanHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdatePlanRequest>,
) -> ApiResult<PlanDto> {
    let changes = PlanChanges {
        name: request.name,
        description: request.description,
        price: request.price,
        currency: request.currency.map(|c| c.to_uppercase()),
        duration_days: request.duration_days,
        swap_limit: request.swap_limit,
        battery_count: request.battery_count,
        is_active: request.is_active,
    };
    let plan = state.plans.update(id, changes).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(plan.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/plans/{id}",
    tag = "Plans",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Plan ID")),
    responses(
        (status = 200, description = "Plan deleted"),
        (status = 409, description = "Plan has subscriptions; deactivate it instead")
    )
)]
pub async fn delete_plan(
    State(state): State<PlanHandlerState>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    state.plans.delete(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(())))
}
