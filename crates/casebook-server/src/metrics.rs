//! Prometheus metrics recorder, request instrumentation, and the `/metrics`
//! endpoint.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Install the Prometheus metrics recorder (global).
///
/// Returns the `PrometheusHandle` used to render the `/metrics` endpoint.
/// Call once at startup before any metrics are recorded.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("prometheus metrics recorder installed");
    Ok(handle)
}

/// A handle whose recorder is not installed globally. Renders nothing
/// recorded through the `metrics` macros; used by tests and embedders that
/// bring their own recorder.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}

/// Render Prometheus text format from the recorder.
pub fn render(handle: &PrometheusHandle) -> String {
    handle.render()
}

/// Count and time every request by matched route.
pub async fn track_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |p| p.as_str().to_string());

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    metrics::counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "method" => method,
        "route" => route
    )
    .record(start.elapsed().as_secs_f64());

    response
}

// Metric name constants to avoid typos across modules.

/// HTTP requests total (counter, labels: method, route, status).
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
/// HTTP error responses total (counter, labels: status).
pub const HTTP_ERRORS_TOTAL: &str = "http_errors_total";
/// HTTP request duration seconds (histogram, labels: method, route).
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
/// Workflow step mutations total (counter, labels: action).
pub const WORKFLOW_MUTATIONS_TOTAL: &str = "workflow_mutations_total";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_handle_renders() {
        let handle = detached_handle();
        let output = render(&handle);
        assert!(output.is_empty() || output.contains('#') || output.contains('\n'));
    }

    #[test]
    fn metric_constants_are_snake_case() {
        let names = [
            HTTP_REQUESTS_TOTAL,
            HTTP_ERRORS_TOTAL,
            HTTP_REQUEST_DURATION_SECONDS,
            WORKFLOW_MUTATIONS_TOTAL,
        ];
        for name in names {
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "metric name '{name}' must be snake_case"
            );
        }
    }
}
