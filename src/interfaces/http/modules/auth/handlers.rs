//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};

use super::dto::{ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, UserInfo};
use crate::application::UserService;
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct AuthHandlerState {
    pub users: Arc<UserService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials or disabled account")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let result = state
        .users
        .login(&request.username, &request.password)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(result.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Driver account created", body = ApiResponse<UserInfo>),
        (status = 409, description = "Username or email already taken"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserInfo>>), ApiError> {
    let user = state
        .users
        .register(
            &request.username,
            &request.email,
            &request.password,
            request.phone,
        )
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserInfo>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_user(
    State(state): State<AuthHandlerState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> ApiResult<UserInfo> {
    let user = state
        .users
        .get_user(&auth.user_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 401, description = "Current password is wrong")
    )
)]
pub async fn change_password(
    State(state): State<AuthHandlerState>,
    Extension(auth): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<()> {
    state
        .users
        .change_password(
            &auth.user_id,
            &request.current_password,
            &request.new_password,
        )
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(())))
}
