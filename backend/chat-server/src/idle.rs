//! Idle shutdown: stop the server once nobody has been connected for a while.

use chat_ws::{Broadcaster, ShutdownCoordinator};

use std::time::Duration;

use log::{info, warn};
use tokio::task::JoinHandle;

/// Longest wait before the first membership check
const MAX_GRACE_PERIOD_SECS: u64 = 60;
const MIN_CHECK_INTERVAL_SECS: u64 = 10;

/// Time allowed after startup before the first check
pub fn grace_period(idle_timeout_secs: u64) -> Duration {
    Duration::from_secs(idle_timeout_secs.min(MAX_GRACE_PERIOD_SECS))
}

/// Gap between the two checks that must both see zero members
pub fn check_interval(idle_timeout_secs: u64) -> Duration {
    Duration::from_secs((idle_timeout_secs / 2).max(MIN_CHECK_INTERVAL_SECS))
}

/// Shut down after `idle_timeout_secs` with no members.
///
/// Membership is checked twice, `check_interval` apart, so a brief gap between
/// clients does not count. The task ends once shutdown has been triggered,
/// by this monitor or anything else.
pub fn spawn_idle_monitor(
    idle_timeout_secs: u64,
    broadcaster: Broadcaster,
    shutdown: ShutdownCoordinator,
) -> JoinHandle<()> {
    info!("Idle shutdown enabled: {}s timeout", idle_timeout_secs);

    tokio::spawn(async move {
        let grace_period = grace_period(idle_timeout_secs);
        info!("Idle shutdown grace period: {}s", grace_period.as_secs());
        tokio::time::sleep(grace_period).await;

        let check_interval = check_interval(idle_timeout_secs);

        while !shutdown.is_shutdown() {
            tokio::time::sleep(check_interval).await;

            if broadcaster.stats().members > 0 {
                continue;
            }
            info!(
                "No members, checking again in {}s...",
                check_interval.as_secs()
            );

            tokio::time::sleep(check_interval).await;

            if broadcaster.stats().members == 0 {
                warn!(
                    "No members for {}s, initiating auto-shutdown",
                    idle_timeout_secs
                );
                shutdown.shutdown();
                break;
            }
            info!("Member joined, continuing...");
        }
    })
}
