//! Single-writer membership and fan-out engine.
//!
//! [`Broadcaster`] is a cloneable handle that only enqueues events.
//! [`BroadcasterLoop`] owns the [`Registry`] and is the one task that applies
//! join, leave and forward events, one at a time, in the order it dequeues them.

use crate::{
    BroadcastConfig, BroadcastMessage, BroadcastStats, Metrics, PeerHandle, PeerId, Registry,
    Result as WsErrorResult, ShutdownGuard, WsError,
};

use log::{debug, info};
use tokio::sync::{mpsc, watch};

/// Handle for submitting events to the control loop
#[derive(Clone)]
pub struct Broadcaster {
    join_tx: mpsc::Sender<PeerHandle>,
    leave_tx: mpsc::Sender<PeerId>,
    forward_tx: mpsc::Sender<BroadcastMessage>,
    stats_rx: watch::Receiver<BroadcastStats>,
}

/// The control loop. Consumed by [`BroadcasterLoop::run`].
pub struct BroadcasterLoop {
    join_rx: mpsc::Receiver<PeerHandle>,
    leave_rx: mpsc::Receiver<PeerId>,
    forward_rx: mpsc::Receiver<BroadcastMessage>,
    registry: Registry,
    stats: BroadcastStats,
    stats_tx: watch::Sender<BroadcastStats>,
    metrics: Metrics,
}

impl Broadcaster {
    /// Create a handle and the loop that serves it. Events sent before the loop
    /// runs are buffered up to each queue's capacity.
    pub fn new(config: BroadcastConfig, metrics: Metrics) -> (Self, BroadcasterLoop) {
        let (join_tx, join_rx) = mpsc::channel(config.join_capacity.max(1));
        let (leave_tx, leave_rx) = mpsc::channel(config.leave_capacity.max(1));
        let (forward_tx, forward_rx) = mpsc::channel(config.forward_capacity.max(1));
        let (stats_tx, stats_rx) = watch::channel(BroadcastStats::default());

        let handle = Self {
            join_tx,
            leave_tx,
            forward_tx,
            stats_rx,
        };

        let control_loop = BroadcasterLoop {
            join_rx,
            leave_rx,
            forward_rx,
            registry: Registry::new(),
            stats: BroadcastStats::default(),
            stats_tx,
            metrics,
        };

        (handle, control_loop)
    }

    /// Queue a join. The peer is a member before any forward queued after this returns.
    pub async fn join(&self, peer: PeerHandle) -> WsErrorResult<()> {
        self.join_tx
            .send(peer)
            .await
            .map_err(|_| WsError::broadcaster_stopped("join"))
    }

    /// Queue a leave. Leaving a peer that is not registered is a no-op.
    pub async fn leave(&self, peer_id: PeerId) -> WsErrorResult<()> {
        self.leave_tx
            .send(peer_id)
            .await
            .map_err(|_| WsError::broadcaster_stopped("leave"))
    }

    /// Queue a message for fan-out to every member registered when it is processed.
    pub async fn forward(&self, message: BroadcastMessage) -> WsErrorResult<()> {
        self.forward_tx
            .send(message)
            .await
            .map_err(|_| WsError::broadcaster_stopped("forward"))
    }

    /// Stats as of the last processed event
    pub fn stats(&self) -> BroadcastStats {
        *self.stats_rx.borrow()
    }

    /// Receiver that observes stats after every processed event
    pub fn watch_stats(&self) -> watch::Receiver<BroadcastStats> {
        self.stats_rx.clone()
    }

    /// True once the control loop has exited
    pub fn is_stopped(&self) -> bool {
        self.forward_tx.is_closed()
    }
}

impl BroadcasterLoop {
    /// Process events until shutdown or until every [`Broadcaster`] handle is dropped.
    ///
    /// Ready queues are polled join, forward, leave. On exit all remaining
    /// members are released, closing their mailboxes.
    pub async fn run(mut self, mut shutdown: ShutdownGuard) -> BroadcastStats {
        info!("Broadcaster control loop started");

        loop {
            tokio::select! {
                biased;

                _ = shutdown.wait() => {
                    info!("Broadcaster received shutdown signal");
                    break;
                }
                Some(peer) = self.join_rx.recv() => self.on_join(peer),
                Some(message) = self.forward_rx.recv() => self.on_forward(message),
                // Handles hold all three senders, so the last queue polled closes last
                next = self.leave_rx.recv() => match next {
                    Some(peer_id) => self.on_leave(peer_id),
                    None => {
                        info!("All broadcaster handles dropped");
                        break;
                    }
                },
            }

            self.publish();
        }

        let released = self.registry.clear();
        self.stats.members = 0;
        self.publish();

        info!(
            "Broadcaster control loop stopped ({} members released, {} messages forwarded)",
            released, self.stats.forwards
        );

        self.stats
    }

    fn on_join(&mut self, peer: PeerHandle) {
        let peer_id = peer.id();
        if self.registry.insert(peer) {
            self.stats.joins += 1;
            info!("Peer {peer_id} joined ({} members)", self.registry.len());
        } else {
            debug!("Peer {peer_id} already registered, join ignored");
        }
    }

    fn on_leave(&mut self, peer_id: PeerId) {
        self.stats.leaves += 1;
        if self.registry.remove(peer_id) {
            info!("Peer {peer_id} left ({} members)", self.registry.len());
        } else {
            debug!("Peer {peer_id} not registered, leave ignored");
        }
    }

    fn on_forward(&mut self, message: BroadcastMessage) {
        let fan_out = self.registry.fan_out(&message);

        self.stats.forwards += 1;
        self.stats.delivered += fan_out.delivered as u64;
        self.stats.dropped += fan_out.dropped.len() as u64;
        self.metrics.fan_out(fan_out.delivered, fan_out.dropped.len());

        debug!(
            "Forwarded {} bytes to {} peers ({} dropped)",
            message.len(),
            fan_out.delivered,
            fan_out.dropped.len()
        );
    }

    fn publish(&mut self) {
        self.stats.members = self.registry.len();
        self.metrics.members(self.stats.members);
        self.stats_tx.send_replace(self.stats);
    }
}
