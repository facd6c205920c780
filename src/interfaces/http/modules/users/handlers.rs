//! User management API handlers (admin only)

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{parse_role, CreateUserRequest, ListUsersParams, UpdateUserRequest, UserDto};
use crate::application::{NewUser, UserChanges, UserService};
use crate::domain::UserQuery;
use crate::interfaces::http::common::{
    domain_error, ApiError, ApiResponse, ApiResult, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::shared::PaginationParams;

#[derive(Clone)]
pub struct UserHandlerState {
    pub users: Arc<UserService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ListUsersParams),
    responses(
        (status = 200, description = "User list", body = ApiResponse<PaginatedResponse<UserDto>>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    Query(params): Query<ListUsersParams>,
) -> ApiResult<PaginatedResponse<UserDto>> {
    let query = UserQuery {
        search: params.search,
        role: params.role.as_deref().map(parse_role).transpose()?,
        pagination: PaginationParams::new(params.page, params.limit),
    };
    let result = state.users.list_users(query).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(result))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<UserDto> {
    let user = state.users.get_user(&id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserDto>),
        (status = 409, description = "Already exists")
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    let role = parse_role(&request.role)?;
    let user = state
        .users
        .create_user(NewUser {
            username: request.username,
            email: request.email,
            password: request.password,
            phone: request.phone,
            role,
        })
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<UserDto> {
    let changes = UserChanges {
        email: request.email,
        phone: request.phone,
        role: request.role.as_deref().map(parse_role).transpose()?,
        is_active: request.is_active,
    };
    let user = state
        .users
        .update_user(&id, changes)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Cannot delete own account")
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state
        .users
        .delete_user(&id, &auth.user_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(())))
}
