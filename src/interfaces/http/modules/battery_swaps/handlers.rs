//! Battery swap API handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::*;
use crate::application::BatterySwapService;
use crate::domain::SwapQuery;
use crate::interfaces::http::common::{
    domain_error, ApiError, ApiResponse, ApiResult, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::shared::PaginationParams;

#[derive(Clone)]
pub struct SwapHandlerState {
    pub swaps: Arc<BatterySwapService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/battery-swaps",
    tag = "Battery Swaps",
    security(("bearer_auth" = [])),
    request_body = CompleteSwapRequest,
    responses(
        (status = 201, description = "Swap recorded, one entry per slot", body = ApiResponse<Vec<BatterySwapDto>>),
        (status = 403, description = "Staff only"),
        (status = 409, description = "Booking not open or subscription inactive")
    )
)]
pub async fn complete_swap(
    State(state): State<SwapHandlerState>,
    ValidatedJson(request): ValidatedJson<CompleteSwapRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<BatterySwapDto>>>), ApiError> {
    let swaps = state
        .swaps
        .complete_swap(request.appointment_id, request.returned_battery_ids)
        .await
        .map_err(domain_error)?;
    let dto = swaps.into_iter().map(BatterySwapDto::from).collect();
    Ok((StatusCode::CREATED, Json(ApiResponse::success(dto))))
}

#[utoipa::path(
    get,
    path = "/api/v1/battery-swaps",
    tag = "Battery Swaps",
    security(("bearer_auth" = [])),
    params(ListSwapsParams),
    responses(
        (status = 200, description = "Swap history, newest first", body = ApiResponse<PaginatedResponse<BatterySwapDto>>)
    )
)]
pub async fn list_swaps(
    State(state): State<SwapHandlerState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(params): Query<ListSwapsParams>,
) -> ApiResult<PaginatedResponse<BatterySwapDto>> {
    let user_id = if auth.is_staff() {
        params.user_id
    } else {
        Some(auth.user_id)
    };
    let query = SwapQuery {
        user_id,
        station_id: params.station_id,
        pagination: PaginationParams::new(params.page, params.limit),
    };
    let result = state.swaps.list(query).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(result))))
}
