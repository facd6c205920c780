//! `X-Request-Id` correlation middleware

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Incoming ids longer than this are replaced with a fresh one.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Reuses a client-supplied `X-Request-Id` or generates a UUID v4, stores it
/// in the request extensions, runs the request inside a `request` span
/// carrying the id, and echoes it in the response.
pub async fn request_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
    );

    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = request_id.parse() {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Request id stored in request extensions (`Extension<RequestId>`)
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Extension, Router};

    async fn echo(Extension(RequestId(id)): Extension<RequestId>) -> String {
        id
    }

    async fn send(header: Option<&str>) -> (String, String) {
        use tower::Service;
        let app = Router::new()
            .route("/", get(echo))
            .layer(middleware::from_fn(request_id_middleware));

        let mut req = Request::builder().uri("/");
        if let Some(h) = header {
            req = req.header(REQUEST_ID_HEADER, h);
        }
        let resp = app
            .into_service()
            .call(req.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let echoed = resp.headers()[REQUEST_ID_HEADER].to_str().unwrap().to_string();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (echoed, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn client_id_is_propagated() {
        let (header, body) = send(Some("req-42")).await;
        assert_eq!(header, "req-42");
        assert_eq!(body, "req-42");
    }

    #[tokio::test]
    async fn missing_id_is_generated() {
        let (header, body) = send(None).await;
        assert_eq!(header, body);
        assert!(Uuid::parse_str(&header).is_ok());
    }
}
