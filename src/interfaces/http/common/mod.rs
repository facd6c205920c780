//! Common API DTOs and error mapping

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;
use crate::shared::PaginatedResult;

/// Standard API response wrapper.
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "message"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// Payload; `null` on error
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Page of items with paging metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    /// Total items across all pages
    pub total: u64,
    /// Current page (1-based)
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = ((total as f64) / (limit.max(1) as f64)).ceil() as u32;
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }

    pub fn from_result<U>(result: PaginatedResult<U>) -> Self
    where
        T: From<U>,
    {
        Self::new(
            result.items.into_iter().map(T::from).collect(),
            result.total,
            result.page,
            result.limit,
        )
    }
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ApiResponse::error(message)))
}

/// Map a domain error onto its HTTP status.
pub fn domain_error(e: DomainError) -> ApiError {
    let status = match &e {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::Database(_) | DomainError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %e, "Request failed");
    }
    error_response(status, e.to_string())
}

/// Parse a status-like query value against its accepted spellings.
pub fn parse_enum<T>(value: &str, accepted: &[(&str, T)]) -> Result<T, ApiError>
where
    T: Copy,
{
    accepted
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(value))
        .map(|(_, v)| *v)
        .ok_or_else(|| {
            let names: Vec<&str> = accepted.iter().map(|(n, _)| *n).collect();
            error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid value '{}', expected one of: {}", value, names.join(", ")),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_status_codes() {
        let cases = [
            (DomainError::not_found("Plan", "id", 1), StatusCode::NOT_FOUND),
            (DomainError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (DomainError::Conflict("taken".into()), StatusCode::CONFLICT),
            (DomainError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (DomainError::Database("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::Internal("bcrypt".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let (status, Json(body)) = domain_error(err);
            assert_eq!(status, expected);
            assert!(!body.success);
            assert!(body.error.is_some());
        }
    }

    #[test]
    fn parse_enum_is_case_insensitive() {
        let accepted = [("Ready", 1), ("Charging", 2)];
        assert_eq!(parse_enum("ready", &accepted).unwrap(), 1);
        let (status, _) = parse_enum("broken", &accepted).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = PaginatedResponse::new(vec![1, 2], 41, 1, 20);
        assert_eq!(page.total_pages, 3);
    }
}
