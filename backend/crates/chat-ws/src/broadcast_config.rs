/// Capacities of the broadcaster's join, leave and forward queues
#[derive(Debug, Clone)]
pub struct BroadcastConfig {
    pub join_capacity: usize,
    pub leave_capacity: usize,
    pub forward_capacity: usize,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            join_capacity: 256,
            leave_capacity: 256,
            forward_capacity: 256,
        }
    }
}
