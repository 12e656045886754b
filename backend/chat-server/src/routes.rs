use crate::{health, metrics};

use chat_ws::AppState;

use axum::{Extension, Router, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints.
///
/// `/metrics` is only mounted when a Prometheus handle is supplied.
pub fn build_router(state: AppState, prometheus: Option<PrometheusHandle>) -> Router {
    let router = Router::new()
        // WebSocket endpoint
        .route("/ws", get(chat_ws::handler))
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        .with_state(state);

    let router = match prometheus {
        Some(handle) => router
            .route("/metrics", get(metrics::render))
            .layer(Extension(handle)),
        None => router,
    };

    // CORS middleware (allow all origins for WebSocket)
    router.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
