mod property_tests;

use crate::{BroadcastMessage, PeerHandle, PeerId};

use tokio::sync::mpsc;

/// A registry-ready handle plus the receiving end of its mailbox
pub(crate) fn member(capacity: usize) -> (PeerHandle, mpsc::Receiver<BroadcastMessage>) {
    let (tx, rx) = mpsc::channel(capacity);
    (PeerHandle::new(PeerId::new(), tx), rx)
}
