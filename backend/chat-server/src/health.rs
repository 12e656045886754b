use chat_ws::AppState;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// GET /health - Broadcaster status and membership
pub async fn health_check(State(state): State<AppState>) -> Response {
    let stats = state.broadcaster.stats();
    let stopped = state.broadcaster.is_stopped();

    let status = if state.shutdown.is_shutdown() {
        "shutting_down"
    } else if stopped {
        "degraded"
    } else {
        "healthy"
    };

    let broadcaster = if stopped { "stopped" } else { "operational" };

    let health = json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "components": {
            "broadcaster": broadcaster,
        },
        "members": stats.members,
        "stats": {
            "joins": stats.joins,
            "leaves": stats.leaves,
            "forwards": stats.forwards,
            "delivered": stats.delivered,
            "dropped": stats.dropped,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(health)).into_response()
}

/// GET /live - Liveness probe (is the process alive?)
pub async fn liveness_check() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// GET /ready - Readiness probe; fails once shutdown has begun
pub async fn readiness_check(State(state): State<AppState>) -> Response {
    if state.shutdown.is_shutdown() || state.broadcaster.is_stopped() {
        return (StatusCode::SERVICE_UNAVAILABLE, "Shutting down").into_response();
    }

    (StatusCode::OK, "Ready").into_response()
}
