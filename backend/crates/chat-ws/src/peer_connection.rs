//! Contract between a [`Peer`](crate::Peer) and the transport it is attached to.
//!
//! The peer never sees frames or encodings: every received unit is one opaque
//! [`BroadcastMessage`], relayed verbatim.

use crate::{BroadcastMessage, Result as WsErrorResult};

use async_trait::async_trait;

/// A physical connection that can be split into independent read and write halves
pub trait PeerConnection: Send + 'static {
    type Source: PeerSource;
    type Sink: PeerSink;

    fn split(self) -> (Self::Source, Self::Sink);
}

/// Read half of a connection
#[async_trait]
pub trait PeerSource: Send + 'static {
    /// Wait for the next message.
    ///
    /// Orderly close is reported as [`WsError::ConnectionClosed`](crate::WsError::ConnectionClosed);
    /// every error ends the inbound pump.
    async fn receive(&mut self) -> WsErrorResult<BroadcastMessage>;
}

/// Write half of a connection
#[async_trait]
pub trait PeerSink: Send + 'static {
    async fn send(&mut self, message: BroadcastMessage) -> WsErrorResult<()>;

    /// Close the connection for writing. Must not block indefinitely.
    async fn close(&mut self);
}
