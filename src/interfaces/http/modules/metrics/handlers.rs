//! `GET /metrics`: Prometheus text exposition of the global recorder.
//!
//! Besides the HTTP series this carries the booking counters
//! `slots_locked_total`, `bookings_created_total` and
//! `payments_completed_total`.

use axum::{extract::State, http::header, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

/// Prometheus scrape endpoint (no auth)
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.handle.render(),
    )
}
