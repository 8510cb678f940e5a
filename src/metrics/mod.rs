use axum::{extract::State, http::header, response::IntoResponse, routing::get, Router};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

use crate::dashboard::Readings;

fn recorder_builder() -> Result<PrometheusBuilder, BuildError> {
    const EXPONENTIAL_SECONDS: &[f64] = &[
        0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ];

    PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full("rpc_fetch_duration_seconds".to_string()),
        EXPONENTIAL_SECONDS,
    )
}

pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    recorder_builder()?.install_recorder()
}

/// `GET /metrics` in the Prometheus text format.
pub fn create_metrics_router(metrics: Metrics) -> Router {
    Router::new()
        .route("/metrics", get(serve_metrics))
        .with_state(metrics)
}

async fn serve_metrics(State(metrics): State<Metrics>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics.render(),
    )
}

#[derive(Clone)]
pub struct Metrics {
    pub prometheus_handle: PrometheusHandle,
}

impl Metrics {
    pub fn new(prometheus_handle: PrometheusHandle) -> Self {
        Self { prometheus_handle }
    }

    pub fn render(&self) -> String {
        self.prometheus_handle.render()
    }
}

/// Records one completed round of RPC calls and how long it took.
pub fn record_fetch(duration: Duration, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::increment_counter!("rpc_fetch_total", "outcome" => outcome);
    if !success {
        metrics::increment_counter!("rpc_fetch_failures_total");
    }
    metrics::histogram!("rpc_fetch_duration_seconds", duration.as_secs_f64());
}

/// Mirrors the latest chain readings as gauges.
pub fn record_readings(readings: &Readings) {
    metrics::gauge!("chain_block_number", readings.block_number as f64);
    metrics::gauge!("chain_id", readings.chain_id as f64);
    metrics::gauge!("account_nonce", readings.nonce as f64);
    metrics::gauge!("account_balance_wei", readings.balance_wei as f64);
    metrics::gauge!("gas_price_wei", readings.gas_price_wei as f64);
}
