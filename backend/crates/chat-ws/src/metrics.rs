use metrics::{counter, gauge, histogram};

/// Metrics collector for the broadcaster and its peers
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "chat_ws" }
    }

    /// Record a peer joining after a successful upgrade
    pub fn peer_connected(&self) {
        counter!(format!("{}.peers.connected", self.prefix)).increment(1);
        gauge!(format!("{}.peers.active", self.prefix)).increment(1.0);
    }

    /// Record a peer's connection lifetime ending
    pub fn peer_disconnected(&self, reason: &str) {
        counter!(format!("{}.peers.disconnected", self.prefix)).increment(1);
        counter!(format!("{}.peers.disconnected.{}", self.prefix, reason)).increment(1);
        gauge!(format!("{}.peers.active", self.prefix)).decrement(1.0);
    }

    /// Record a message read from a peer
    pub fn message_received(&self, bytes: usize) {
        counter!(format!("{}.messages.received", self.prefix)).increment(1);
        histogram!(format!("{}.messages.size_bytes", self.prefix)).record(bytes as f64);
    }

    /// Record a message written to a peer
    pub fn message_sent(&self) {
        counter!(format!("{}.messages.sent", self.prefix)).increment(1);
    }

    pub fn fan_out(&self, delivered: usize, dropped: usize) {
        counter!(format!("{}.broadcast.forwarded", self.prefix)).increment(1);
        counter!(format!("{}.broadcast.delivered", self.prefix)).increment(delivered as u64);
        if dropped > 0 {
            counter!(format!("{}.broadcast.slow_peers_dropped", self.prefix))
                .increment(dropped as u64);
        }
    }

    pub fn members(&self, count: usize) {
        gauge!(format!("{}.broadcast.members", self.prefix)).set(count as f64);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
