use crate::ShutdownCoordinator;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;

/// Waits for the coordinator's shutdown signal inside an async task.
///
/// A guard created after shutdown was triggered still observes it.
pub struct ShutdownGuard {
    shutdown_rx: broadcast::Receiver<()>,
    triggered: Arc<AtomicBool>,
}

impl ShutdownGuard {
    pub fn new(coordinator: &ShutdownCoordinator) -> Self {
        Self {
            shutdown_rx: coordinator.subscribe(),
            triggered: coordinator.triggered_flag(),
        }
    }

    /// Resolves on shutdown, or when the coordinator is gone. Cancel safe.
    pub async fn wait(&mut self) {
        if self.triggered.load(Ordering::SeqCst) {
            return;
        }
        let _ = self.shutdown_rx.recv().await;
    }

    /// Non-blocking check; consumes the signal if present
    pub fn poll_shutdown(&mut self) -> bool {
        let signalled = matches!(
            self.shutdown_rx.try_recv(),
            Ok(())
                | Err(broadcast::error::TryRecvError::Closed)
                | Err(broadcast::error::TryRecvError::Lagged(_))
        );
        signalled || self.triggered.load(Ordering::SeqCst)
    }
}
