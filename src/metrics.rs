use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use mydesk_config::ObservabilityConfig;

const REQUEST_DURATION: &str = "http_request_duration_seconds";

const DURATION_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Whether metrics are recorded, from `OBSERVABILITY_ENABLED` unless
/// [`init_metrics`] already fixed it from configuration.
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| ObservabilityConfig::from_env().enabled)
}

/// Installs the Prometheus recorder and its upkeep task.
/// Returns `None` when observability is disabled.
pub fn init_metrics(config: &ObservabilityConfig) -> Result<Option<PrometheusHandle>, BuildError> {
    let _ = OBSERVABILITY_ENABLED.set(config.enabled);
    if !is_observability_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION.to_string()), DURATION_BUCKETS)?
        .install_recorder()?;

    let upkeep = handle.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(5));
        loop {
            interval.tick().await;
            upkeep.run_upkeep();
        }
    });

    Ok(Some(handle))
}

/// Keeps `http_requests_active` honest when a request future is dropped
/// before it completes.
struct InFlight;

impl InFlight {
    fn start() -> Self {
        gauge!("http_requests_active").increment(1.0);
        InFlight
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        gauge!("http_requests_active").decrement(1.0);
    }
}

fn status_class(status: u16) -> &'static str {
    match status {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    }
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let method = req.method().as_str().to_owned();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let _in_flight = InFlight::start();
    let start = Instant::now();
    let response = next.run(req).await;
    let latency = start.elapsed().as_secs_f64();

    let status = response.status().as_u16();
    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.to_string(),
        "class" => status_class(status)
    )
    .increment(1);
    histogram!(REQUEST_DURATION, "method" => method, "path" => path).record(latency);

    response
}

/// Router exposing `GET /metrics`.
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

// Domain counters

pub fn track_department_created() {
    if is_observability_enabled() {
        counter!("departments_created_total").increment(1);
    }
}

/// `target` is what was asked to be joined: `department` or `section`.
pub fn track_join_request(target: &'static str) {
    if is_observability_enabled() {
        counter!("join_requests_total", "target" => target).increment(1);
    }
}

pub fn track_soft_delete(entity: &'static str) {
    if is_observability_enabled() {
        counter!("soft_deletes_total", "entity" => entity).increment(1);
    }
}

/// A context pipeline stopped at `check`.
pub fn track_context_rejection(check: &'static str) {
    if is_observability_enabled() {
        counter!("context_rejections_total", "check" => check).increment(1);
    }
}
