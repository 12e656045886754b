//! Prometheus recorder and the `/metrics` endpoint.

use crate::error::Result as ServerErrorResult;

use std::time::Duration;

use axum::Extension;
use log::info;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// How often histogram buckets are drained
pub const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Install the Prometheus recorder as the global `metrics` recorder.
///
/// Call once at startup, before any metric is recorded.
pub fn install_recorder() -> ServerErrorResult<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("Prometheus metrics recorder installed");
    Ok(handle)
}

/// Periodic recorder maintenance; runs until the runtime shuts down.
pub async fn run_upkeep(handle: PrometheusHandle) {
    let mut interval = tokio::time::interval(UPKEEP_INTERVAL);
    loop {
        interval.tick().await;
        handle.run_upkeep();
    }
}

/// GET /metrics - Prometheus text exposition
pub async fn render(Extension(handle): Extension<PrometheusHandle>) -> String {
    handle.render()
}
