//! JSON body extractor with `validator` checks
//!
//! `ValidatedJson<T>` deserializes like `axum::Json<T>` and then runs
//! `Validate::validate()`. Malformed JSON is a 400, field errors are a 422
//! listing every failing field.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiResponse;

/// ```ignore
/// async fn create(ValidatedJson(body): ValidatedJson<CreatePlanRequest>) { .. }
/// ```
pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    JsonError(JsonRejection),
    ValidationError(ValidationErrors),
}

/// `field: message` pairs sorted by field name.
fn describe(errors: &ValidationErrors) -> String {
    let mut lines: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, msg)
            })
        })
        .collect();
    lines.sort();

    if lines.is_empty() {
        "Validation failed".to_string()
    } else {
        lines.join("; ")
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::JsonError(rejection) => {
                let body = ApiResponse::<()>::error(format!("Invalid JSON: {}", rejection));
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::ValidationError(errors) => {
                let body = ApiResponse::<()>::error(describe(&errors));
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: axum::extract::Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct PillarBody {
        #[validate(length(min = 1, max = 20, message = "code must be 1-20 characters"))]
        code: String,
        #[validate(range(min = 1, max = 50))]
        slot_count: i32,
    }

    async fn handler(ValidatedJson(body): ValidatedJson<PillarBody>) -> String {
        format!("{}:{}", body.code, body.slot_count)
    }

    fn app() -> Router {
        Router::new().route("/pillars", post(handler))
    }

    fn json_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/pillars")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(req: Request<Body>) -> axum::http::Response<Body> {
        use tower::Service;
        let mut svc = app().into_service();
        svc.call(req).await.unwrap()
    }

    async fn error_message(resp: axum::http::Response<Body>) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: ApiResponse<()> = serde_json::from_slice(&bytes).unwrap();
        assert!(!body.success);
        body.error.unwrap()
    }

    #[tokio::test]
    async fn valid_body_reaches_handler() {
        let resp = send(json_request(r#"{"code": "P1", "slot_count": 8}"#)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"P1:8");
    }

    #[tokio::test]
    async fn malformed_json_returns_400() {
        let resp = send(json_request("{\"code\": ")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(error_message(resp).await.starts_with("Invalid JSON"));
    }

    #[tokio::test]
    async fn field_errors_return_422_with_every_field() {
        let resp = send(json_request(r#"{"code": "", "slot_count": 0}"#)).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let message = error_message(resp).await;
        assert!(message.contains("code: code must be 1-20 characters"));
        assert!(message.contains("slot_count: range"));
        assert!(message.find("code:") < message.find("slot_count:"));
    }
}
