/// Configuration for peer connections
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Outbound mailbox capacity. A peer whose mailbox is full during fan-out is dropped.
    pub mailbox_capacity: usize,
    pub read_buffer_size: usize,
    pub write_buffer_size: usize,
    pub max_message_size: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 256,
            read_buffer_size: 1024,
            write_buffer_size: 1024,
            max_message_size: 64 * 1024,
        }
    }
}
