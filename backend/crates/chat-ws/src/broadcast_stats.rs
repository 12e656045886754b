/// Counters published by the control loop after every processed event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastStats {
    /// Currently registered peers
    pub members: usize,
    pub joins: u64,
    /// Leave events processed, including no-op leaves
    pub leaves: u64,
    pub forwards: u64,
    /// Peers removed during fan-out because their mailbox was full or gone
    pub dropped: u64,
    /// Mailbox enqueues that succeeded
    pub delivered: u64,
}
