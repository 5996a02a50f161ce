//! Prometheus metrics for the API server (C9) and the scheduler/worker
//! gauges it repoints at (§6.1a).

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "clipcast_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "clipcast_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "clipcast_http_requests_in_flight";
    pub const RATE_LIMIT_HITS_TOTAL: &str = "clipcast_rate_limit_hits_total";

    // Scheduler/worker gauges, refreshed periodically by `services::GaugeRefresher`.
    pub const ACTIVE_JOBS: &str = "clipcast_active_jobs";
    pub const QUEUE_DEPTH: &str = "clipcast_queue_depth";
    pub const TODAY_SPEND_USD: &str = "clipcast_today_spend_usd";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a rate limit rejection.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", sanitize_path(endpoint))];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Set the `active_jobs` gauge (§6.1a).
pub fn set_active_jobs(count: usize) {
    gauge!(names::ACTIVE_JOBS).set(count as f64);
}

/// Set the `queue_depth` gauge (§6.1a).
pub fn set_queue_depth(count: usize) {
    gauge!(names::QUEUE_DEPTH).set(count as f64);
}

/// Set the `today_spend_usd` gauge (§6.1a).
pub fn set_today_spend_usd(spend: f64) {
    gauge!(names::TODAY_SPEND_USD).set(spend);
}

/// Sanitize a path for metrics labels: collapse job/transcript IDs so
/// cardinality doesn't grow with every submitted job.
fn sanitize_path(path: &str) -> String {
    let path = regex::Regex::new(r"/(video-status|download-video)/[a-zA-Z0-9]+")
        .unwrap()
        .replace_all(path, "/$1/:job_id");
    let path = regex::Regex::new(r"/transcript/[a-zA-Z0-9_-]+")
        .unwrap()
        .replace_all(&path, "/transcript/:id");
    path.to_string()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);
    let response = next.run(request).await;
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();
    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("/api/video-status/abc123def456"), "/api/video-status/:job_id");
        assert_eq!(sanitize_path("/api/download-video/abc123def456"), "/api/download-video/:job_id");
        assert_eq!(sanitize_path("/api/transcript/ts_abc-123"), "/api/transcript/:id");
    }
}
