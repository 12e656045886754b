use crate::{BroadcastMessage, PeerHandle, PeerId};

use std::collections::HashMap;

use log::{debug, warn};
use tokio::sync::mpsc::{self, error::TrySendError};

/// Current members and their mailboxes.
///
/// Owned by exactly one [`BroadcasterLoop`](crate::BroadcasterLoop); nothing else
/// inserts, removes or iterates it. Dropping an entry drops the only sender of
/// that peer's mailbox, which closes it.
#[derive(Debug, Default)]
pub struct Registry {
    members: HashMap<PeerId, mpsc::Sender<BroadcastMessage>>,
}

/// Outcome of fanning one message out
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FanOut {
    pub delivered: usize,
    /// Peers removed because their mailbox was full or already closed
    pub dropped: Vec<PeerId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member. Returns false if the id is already registered.
    pub fn insert(&mut self, peer: PeerHandle) -> bool {
        let (id, mailbox) = peer.into_parts();
        match self.members.entry(id) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(mailbox);
                true
            }
        }
    }

    /// Remove a member and close its mailbox. Removing a non-member is a no-op.
    pub fn remove(&mut self, id: PeerId) -> bool {
        self.members.remove(&id).is_some()
    }

    /// Offer `message` to every member without blocking.
    ///
    /// A member whose mailbox has no free slot is removed in the same pass and
    /// never sees this or any later message.
    pub fn fan_out(&mut self, message: &BroadcastMessage) -> FanOut {
        let mut outcome = FanOut::default();

        self.members
            .retain(|id, mailbox| match mailbox.try_send(message.clone()) {
                Ok(()) => {
                    outcome.delivered += 1;
                    true
                }
                Err(TrySendError::Full(_)) => {
                    warn!("Peer {id} mailbox full, dropping slow peer");
                    outcome.dropped.push(*id);
                    false
                }
                Err(TrySendError::Closed(_)) => {
                    debug!("Peer {id} mailbox already closed, removing");
                    outcome.dropped.push(*id);
                    false
                }
            });

        outcome
    }

    pub fn contains(&self, id: PeerId) -> bool {
        self.members.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Remove every member, closing all mailboxes. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.members.len();
        self.members.clear();
        count
    }
}
