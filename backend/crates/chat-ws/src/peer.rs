use crate::{
    BroadcastMessage, Broadcaster, ConnectionConfig, Metrics, PeerConnection, PeerId, PeerSink,
    PeerSource,
};

use std::fmt;

use log::{debug, error, info, warn};
use tokio::sync::{mpsc, oneshot};

/// The broadcaster's view of a peer: its id and the only sender into its mailbox.
///
/// Not `Clone`: once the registry drops it, the mailbox is closed.
#[derive(Debug)]
pub struct PeerHandle {
    id: PeerId,
    mailbox: mpsc::Sender<BroadcastMessage>,
}

impl PeerHandle {
    pub(crate) fn new(id: PeerId, mailbox: mpsc::Sender<BroadcastMessage>) -> Self {
        Self { id, mailbox }
    }

    pub fn id(&self) -> PeerId {
        self.id
    }

    pub(crate) fn into_parts(self) -> (PeerId, mpsc::Sender<BroadcastMessage>) {
        (self.id, self.mailbox)
    }
}

/// One connected party: a bounded outbound mailbox plus the two pumps that
/// bridge it and the broadcaster to a connection.
pub struct Peer {
    id: PeerId,
    mailbox: mpsc::Receiver<BroadcastMessage>,
    metrics: Metrics,
}

/// Why a peer's connection lifetime ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerExit {
    /// Remote side closed the connection
    ClientClosed,
    /// Reading from the connection failed
    ReceiveFailed,
    /// Control loop gone, inbound message could not be forwarded
    BroadcasterStopped,
    /// Mailbox closed (left or dropped as slow) and fully drained
    MailboxClosed,
    /// Writing to the connection failed
    SendFailed,
    /// Outbound pump stopped because the inbound pump ended
    HungUp,
}

impl PeerExit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClientClosed => "client_closed",
            Self::ReceiveFailed => "receive_failed",
            Self::BroadcasterStopped => "broadcaster_stopped",
            Self::MailboxClosed => "mailbox_closed",
            Self::SendFailed => "send_failed",
            Self::HungUp => "hung_up",
        }
    }
}

impl fmt::Display for PeerExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Peer {
    /// Create a peer with a fresh id and an empty mailbox of
    /// `config.mailbox_capacity` slots. Hand the [`PeerHandle`] to
    /// [`Broadcaster::join`].
    pub fn new(config: &ConnectionConfig, metrics: Metrics) -> (Self, PeerHandle) {
        let id = PeerId::new();
        let (tx, rx) = mpsc::channel(config.mailbox_capacity.max(1));

        let peer = Self {
            id,
            mailbox: rx,
            metrics,
        };
        let handle = PeerHandle::new(id, tx);

        (peer, handle)
    }

    pub fn id(&self) -> PeerId {
        self.id
    }

    /// Run both pumps over `connection` until its lifetime ends.
    ///
    /// The outbound pump runs on its own task; the inbound pump runs here.
    /// Returns as soon as either side is finished. Does not leave the
    /// broadcaster: the caller owns the matching [`Broadcaster::leave`].
    pub async fn run<C: PeerConnection>(self, connection: C, broadcaster: Broadcaster) -> PeerExit {
        let Peer {
            id,
            mailbox,
            metrics,
        } = self;

        let (source, sink) = connection.split();
        let (hangup_tx, hangup_rx) = oneshot::channel();

        let mut outbound = tokio::spawn(outbound_pump(id, mailbox, sink, hangup_rx, metrics.clone()));

        tokio::select! {
            exit = inbound_pump(id, source, broadcaster, metrics) => {
                let _ = hangup_tx.send(());
                match (&mut outbound).await {
                    Ok(outbound_exit) => debug!("Peer {id} outbound pump stopped: {outbound_exit}"),
                    Err(e) => error!("Peer {id} outbound pump panicked: {e}"),
                }
                exit
            }
            joined = &mut outbound => match joined {
                Ok(exit) => exit,
                Err(e) => {
                    error!("Peer {id} outbound pump panicked: {e}");
                    PeerExit::SendFailed
                }
            },
        }
    }
}

/// Read from the connection and forward every message to the broadcaster.
async fn inbound_pump<S: PeerSource>(
    id: PeerId,
    mut source: S,
    broadcaster: Broadcaster,
    metrics: Metrics,
) -> PeerExit {
    loop {
        match source.receive().await {
            Ok(message) => {
                metrics.message_received(message.len());
                if let Err(e) = broadcaster.forward(message).await {
                    warn!("Peer {id} cannot forward: {e}");
                    return PeerExit::BroadcasterStopped;
                }
            }
            Err(e) if e.is_orderly_close() => {
                info!("Peer {id} closed by client");
                return PeerExit::ClientClosed;
            }
            Err(e) => {
                warn!("Peer {id} receive failed: {e}");
                return PeerExit::ReceiveFailed;
            }
        }
    }
}

/// Drain the mailbox into the connection.
///
/// Stops once the mailbox is closed and empty, on a send error, or on hang-up
/// from the inbound side; closes the sink in every case.
async fn outbound_pump<K: PeerSink>(
    id: PeerId,
    mut mailbox: mpsc::Receiver<BroadcastMessage>,
    mut sink: K,
    mut hangup: oneshot::Receiver<()>,
    metrics: Metrics,
) -> PeerExit {
    let exit = loop {
        let message = tokio::select! {
            biased;

            next = mailbox.recv() => match next {
                Some(message) => message,
                None => break PeerExit::MailboxClosed,
            },
            _ = &mut hangup => break PeerExit::HungUp,
        };

        tokio::select! {
            result = sink.send(message) => match result {
                Ok(()) => metrics.message_sent(),
                Err(e) => {
                    warn!("Peer {id} send failed: {e}");
                    break PeerExit::SendFailed;
                }
            },
            _ = &mut hangup => break PeerExit::HungUp,
        }
    };

    sink.close().await;
    exit
}
