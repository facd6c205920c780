//! HTTP request metrics middleware

use std::time::Instant;

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};

/// Route label for requests no route matched
const UNMATCHED: &str = "unmatched";

fn route_label(request: &Request<Body>) -> String {
    match request.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_owned(),
        None => UNMATCHED.to_owned(),
    }
}

/// Counts requests in `http_requests_total{method, path, status}` and times
/// them in `http_request_duration_seconds{method, path}`.
///
/// `path` is the route template (`/api/v1/bookings/{id}`), never the raw URI.
pub async fn http_metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().as_str().to_owned();
    let path = route_label(&request);
    let started = Instant::now();

    let response = next.run(request).await;

    let elapsed = started.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();
    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.clone(),
        "path" => path.clone()
    )
    .record(elapsed);
    metrics::counter!(
        "http_requests_total",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .increment(1);

    response
}
