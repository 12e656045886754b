use crate::{
    Broadcaster, ConnectionConfig, Metrics, Peer, ShutdownCoordinator, WebSocketConnection,
};

use axum::{
    extract::{
        State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::{debug, info, warn};

/// Shared application state for WebSocket handlers
#[derive(Clone)]
pub struct AppState {
    pub broadcaster: Broadcaster,
    pub metrics: Metrics,
    pub shutdown: ShutdownCoordinator,
    pub config: ConnectionConfig,
}

/// WebSocket upgrade handler
pub async fn handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    if state.shutdown.is_shutdown() || state.broadcaster.is_stopped() {
        debug!("Rejecting WebSocket upgrade during shutdown");
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    let config = state.config.clone();

    ws.read_buffer_size(config.read_buffer_size)
        .write_buffer_size(config.write_buffer_size)
        .max_message_size(config.max_message_size)
        .on_failed_upgrade(|e| warn!("WebSocket upgrade failed: {e}"))
        .on_upgrade(move |socket| handle_socket(socket, state))
}

/// Bootstrap one connection: join, run the pumps, then leave exactly once.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (peer, handle) = Peer::new(&state.config, state.metrics.clone());
    let peer_id = peer.id();

    if let Err(e) = state.broadcaster.join(handle).await {
        // Dropping the socket closes it
        warn!("Peer {peer_id} could not join: {e}");
        return;
    }

    info!("Peer {peer_id} connected");
    state.metrics.peer_connected();

    let exit = peer
        .run(WebSocketConnection::new(socket), state.broadcaster.clone())
        .await;

    if let Err(e) = state.broadcaster.leave(peer_id).await {
        debug!("Peer {peer_id} leave skipped: {e}");
    }

    state.metrics.peer_disconnected(exit.as_str());
    info!("Peer {peer_id} disconnected ({exit})");
}
