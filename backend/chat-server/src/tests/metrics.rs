use crate::routes::build_router;

use chat_ws::{
    AppState, BroadcastConfig, Broadcaster, ConnectionConfig, Metrics, ShutdownCoordinator,
};

use axum::http::StatusCode;
use axum_test::TestServer;
use metrics_exporter_prometheus::PrometheusBuilder;

fn app_state() -> AppState {
    let (broadcaster, _control_loop) =
        Broadcaster::new(BroadcastConfig::default(), Metrics::default());
    AppState {
        broadcaster,
        metrics: Metrics::default(),
        shutdown: ShutdownCoordinator::new(),
        config: ConnectionConfig::default(),
    }
}

#[tokio::test]
async fn given_prometheus_handle_when_metrics_requested_then_ok() {
    // Recorder is built but not installed globally
    let handle = PrometheusBuilder::new().build_recorder().handle();
    let server = TestServer::builder()
        .http_transport()
        .build(build_router(app_state(), Some(handle)))
        .expect("Failed to create test server");

    let response = server.get("/metrics").await;

    response.assert_status_ok();
}

#[tokio::test]
async fn given_no_prometheus_handle_when_metrics_requested_then_not_found() {
    let server = TestServer::builder()
        .http_transport()
        .build(build_router(app_state(), None))
        .expect("Failed to create test server");

    let response = server.get("/metrics").expect_failure().await;

    response.assert_status(StatusCode::NOT_FOUND);
}
