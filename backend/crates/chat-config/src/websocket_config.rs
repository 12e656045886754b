use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Per-peer mailbox: messages buffered for a peer before it counts as too slow
pub const MIN_MAILBOX_CAPACITY: usize = 1;
pub const MAX_MAILBOX_CAPACITY: usize = 65_536;
pub const DEFAULT_MAILBOX_CAPACITY: usize = 256;

// Socket read/write buffers (bytes)
pub const MIN_SOCKET_BUFFER_SIZE: usize = 256;
pub const MAX_SOCKET_BUFFER_SIZE: usize = 1024 * 1024;
pub const DEFAULT_SOCKET_BUFFER_SIZE: usize = 1024;

// Largest single message accepted from a client (bytes)
pub const MIN_MAX_MESSAGE_SIZE: usize = 1024;
pub const MAX_MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024;

/// WebSocket connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSocketConfig {
    /// Outbound mailbox capacity, identical for every peer
    pub mailbox_capacity: usize,
    pub read_buffer_size: usize,
    pub write_buffer_size: usize,
    pub max_message_size: usize,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            read_buffer_size: DEFAULT_SOCKET_BUFFER_SIZE,
            write_buffer_size: DEFAULT_SOCKET_BUFFER_SIZE,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl WebSocketConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !(MIN_MAILBOX_CAPACITY..=MAX_MAILBOX_CAPACITY).contains(&self.mailbox_capacity) {
            return Err(ConfigError::websocket(format!(
                "websocket.mailbox_capacity must be {}-{}, got {}",
                MIN_MAILBOX_CAPACITY, MAX_MAILBOX_CAPACITY, self.mailbox_capacity
            )));
        }

        for (name, value) in [
            ("read_buffer_size", self.read_buffer_size),
            ("write_buffer_size", self.write_buffer_size),
        ] {
            if !(MIN_SOCKET_BUFFER_SIZE..=MAX_SOCKET_BUFFER_SIZE).contains(&value) {
                return Err(ConfigError::websocket(format!(
                    "websocket.{} must be {}-{}, got {}",
                    name, MIN_SOCKET_BUFFER_SIZE, MAX_SOCKET_BUFFER_SIZE, value
                )));
            }
        }

        if !(MIN_MAX_MESSAGE_SIZE..=MAX_MAX_MESSAGE_SIZE).contains(&self.max_message_size) {
            return Err(ConfigError::websocket(format!(
                "websocket.max_message_size must be {}-{}, got {}",
                MIN_MAX_MESSAGE_SIZE, MAX_MAX_MESSAGE_SIZE, self.max_message_size
            )));
        }

        Ok(())
    }
}
