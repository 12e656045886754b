#![allow(dead_code)]

use chat_ws::{
    AppState, BroadcastConfig, BroadcastStats, Broadcaster, ConnectionConfig, Metrics,
    ShutdownCoordinator,
};

use axum::{Router, routing::get};
use axum_test::TestServer;
use tokio::task::JoinHandle;
use tokio::time::{Duration, timeout};

/// Test server with access to AppState for testing
pub struct TestServerWithState {
    pub server: TestServer,
    pub app_state: AppState,
    pub control_loop: JoinHandle<BroadcastStats>,
}

impl TestServerWithState {
    /// Wait until the broadcaster reports exactly `count` members
    pub async fn wait_for_members(&self, count: usize) {
        let mut stats = self.app_state.broadcaster.watch_stats();
        timeout(Duration::from_secs(2), stats.wait_for(|s| s.members == count))
            .await
            .expect("member count did not settle")
            .expect("control loop gone");
    }
}

/// Create a TestServer with default configuration
pub fn create_test_server() -> TestServerWithState {
    create_test_server_with_config(ConnectionConfig::default())
}

/// Create a TestServer with custom per-connection configuration
pub fn create_test_server_with_config(config: ConnectionConfig) -> TestServerWithState {
    let (app, app_state, control_loop) = create_app(config);
    let server = TestServer::builder()
        .http_transport()
        .build(app)
        .expect("Failed to create test server");

    TestServerWithState {
        server,
        app_state,
        control_loop,
    }
}

/// Build the Axum Router with AppState and start the control loop
fn create_app(config: ConnectionConfig) -> (Router, AppState, JoinHandle<BroadcastStats>) {
    let metrics = Metrics::default();
    let shutdown = ShutdownCoordinator::new();

    let (broadcaster, control_loop) = Broadcaster::new(BroadcastConfig::default(), metrics.clone());
    let control_loop = tokio::spawn(control_loop.run(shutdown.subscribe_guard()));

    let app_state = AppState {
        broadcaster,
        metrics,
        shutdown,
        config,
    };

    let router = Router::new()
        .route("/ws", get(chat_ws::handler))
        .with_state(app_state.clone());

    (router, app_state, control_loop)
}
