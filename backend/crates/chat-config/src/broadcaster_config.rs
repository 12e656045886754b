use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_QUEUE_CAPACITY: usize = 1;
pub const MAX_QUEUE_CAPACITY: usize = 65_536;
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Capacities of the broadcaster's three event queues.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BroadcasterConfig {
    pub join_queue_capacity: usize,
    pub leave_queue_capacity: usize,
    pub forward_queue_capacity: usize,
}

impl Default for BroadcasterConfig {
    fn default() -> Self {
        Self {
            join_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            leave_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            forward_queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl BroadcasterConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        for (name, value) in [
            ("join_queue_capacity", self.join_queue_capacity),
            ("leave_queue_capacity", self.leave_queue_capacity),
            ("forward_queue_capacity", self.forward_queue_capacity),
        ] {
            if !(MIN_QUEUE_CAPACITY..=MAX_QUEUE_CAPACITY).contains(&value) {
                return Err(ConfigError::broadcaster(format!(
                    "broadcaster.{} must be {}-{}, got {}",
                    name, MIN_QUEUE_CAPACITY, MAX_QUEUE_CAPACITY, value
                )));
            }
        }

        Ok(())
    }
}
