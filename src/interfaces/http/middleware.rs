//! Authentication middleware for Axum

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::errors::ErrorKind;

use crate::application::Actor;
use crate::domain::UserRole;
use crate::infrastructure::crypto::jwt::{verify_token, AuthError, JwtConfig, TokenClaims};
use crate::interfaces::http::common::ApiResponse;

/// Authentication state
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// User resolved from a valid bearer token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            role: UserRole::from(claims.role.as_str()),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id.clone(), self.role)
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// JWT authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => {
            if claims.is_expired() {
                return auth_error_response(AuthError::ExpiredToken);
            }
            let user = AuthenticatedUser::from_claims(claims);
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
            auth_error_response(AuthError::ExpiredToken)
        }
        Err(_) => auth_error_response(AuthError::InvalidToken),
    }
}

fn require(
    request: Request<Body>,
    allowed: impl Fn(&AuthenticatedUser) -> bool,
) -> Result<Request<Body>, Response> {
    let permitted = request
        .extensions()
        .get::<AuthenticatedUser>()
        .map(|user| allowed(user));
    match permitted {
        Some(true) => Ok(request),
        Some(false) => Err(auth_error_response(AuthError::InsufficientPermissions)),
        None => Err(auth_error_response(AuthError::MissingToken)),
    }
}

/// Admin-only guard. Must run after [`auth_middleware`].
pub async fn require_admin(request: Request<Body>, next: Next) -> Response {
    match require(request, AuthenticatedUser::is_admin) {
        Ok(request) => next.run(request).await,
        Err(response) => response,
    }
}

/// Staff or admin guard. Must run after [`auth_middleware`].
pub async fn require_staff(request: Request<Body>, next: Next) -> Response {
    match require(request, AuthenticatedUser::is_staff) {
        Ok(request) => next.run(request).await,
        Err(response) => response,
    }
}

fn auth_error_response(error: AuthError) -> Response {
    let status = match error {
        AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
        _ => StatusCode::UNAUTHORIZED,
    };
    (status, Json(ApiResponse::<()>::error(error.to_string()))).into_response()
}
