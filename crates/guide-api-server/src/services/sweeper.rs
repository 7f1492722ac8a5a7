use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::conversation::ConversationManager;

/// Spawn the periodic staleness sweep for `manager`.
///
/// The first sweep runs one full `interval` after start. Abort the returned
/// handle to stop it.
pub fn spawn_sweeper(manager: Arc<ConversationManager>, interval: Duration) -> JoinHandle<()> {
    info!(
        "Starting conversation sweeper: every {}s, stale after {} min",
        interval.as_secs(),
        manager.stale_after().num_minutes()
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let removed = manager.cleanup_old_conversations();
            let stats = manager.cache_stats();
            debug!(
                "Sweep done: removed={}, active={}",
                removed, stats.active_sessions
            );
        }
    })
}
