pub mod app_state;
pub mod broadcast_config;
pub mod broadcast_message;
pub mod broadcast_stats;
pub mod broadcaster;
pub mod connection_config;
pub mod error;
pub mod metrics;
pub mod peer;
pub mod peer_connection;
pub mod peer_id;
pub mod registry;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod web_socket_connection;

pub use app_state::{AppState, handler};
pub use broadcast_config::BroadcastConfig;
pub use broadcast_message::BroadcastMessage;
pub use broadcast_stats::BroadcastStats;
pub use broadcaster::{Broadcaster, BroadcasterLoop};
pub use connection_config::ConnectionConfig;
pub use error::{Result, WsError};
pub use metrics::Metrics;
pub use peer::{Peer, PeerExit, PeerHandle};
pub use peer_connection::{PeerConnection, PeerSink, PeerSource};
pub use peer_id::PeerId;
pub use registry::{FanOut, Registry};
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use web_socket_connection::{WebSocketConnection, WebSocketSink, WebSocketSource};

#[cfg(test)]
mod tests;
