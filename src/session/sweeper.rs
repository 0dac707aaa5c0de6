use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info};

use super::SessionManager;

/// Periodically evict sessions idle for longer than `ttl`, until `shutdown`
/// flips to true.
pub async fn session_sweep_loop(
    manager: Arc<SessionManager>,
    ttl: Duration,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(36_500));
    let mut ticker = tokio::time::interval(interval);
    // First tick fires immediately.
    ticker.tick().await;

    info!(
        ttl_secs = ttl.num_seconds(),
        interval_secs = interval.as_secs(),
        "session sweeper started"
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let evicted = manager.evict_idle(chrono::Utc::now(), ttl);
                debug!(evicted, live = manager.len(), "session sweep");
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("session sweeper stopping");
                    return;
                }
            }
        }
    }
}
