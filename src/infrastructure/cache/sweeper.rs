//! Background eviction task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::link_cache::LinkCache;

/// Shortest period the sweeper will tick at.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a running sweeper task.
///
/// Dropping the handle also stops the task, since the stop channel closes.
pub struct Sweeper {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Sweeper {
    /// Signals the task to stop and waits for it to finish.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        let _ = self.handle.await;
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Spawns a task that calls [`LinkCache::sweep`] every `interval`.
///
/// The first sweep happens one full interval after spawning.
pub fn spawn_sweeper(cache: Arc<LinkCache>, interval: Duration) -> Sweeper {
    let interval = interval.max(MIN_INTERVAL);
    let (stop, mut stopped) = watch::channel(false);

    let handle = tokio::spawn(async move {
        info!("Starting cache sweeper with interval of {:?}", interval);

        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = cache.sweep();
                    if removed > 0 {
                        info!("Cache sweep: evicted {} idle entries", removed);
                    } else {
                        debug!("Cache sweep: nothing to evict");
                    }
                }
                changed = stopped.changed() => {
                    if changed.is_err() || *stopped.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Cache sweeper stopped");
    });

    Sweeper { stop, handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::ManualClock;
    use chrono::TimeDelta;

    const INTERVAL: Duration = Duration::from_secs(1);
    const TTL: Duration = Duration::from_secs(30);

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_idle_entries() {
        let clock = Arc::new(ManualClock::default());
        let (cache, sweeper) = LinkCache::start_with_clock(INTERVAL, TTL, clock.clone());

        cache.put("abc123", "http://example.com/a");
        clock.advance(TimeDelta::seconds(31));

        tokio::time::sleep(INTERVAL * 2).await;

        assert!(cache.get("abc123").is_none());
        sweeper.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_preserves_fresh_entries() {
        let clock = Arc::new(ManualClock::default());
        let (cache, sweeper) = LinkCache::start_with_clock(INTERVAL, TTL, clock.clone());

        cache.put("abc123", "http://example.com/a");
        clock.advance(TimeDelta::seconds(10));

        tokio::time::sleep(INTERVAL * 3).await;

        assert_eq!(cache.get("abc123").as_deref(), Some("http://example.com/a"));
        sweeper.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_shutdown_stops_task() {
        let clock = Arc::new(ManualClock::default());
        let (cache, sweeper) = LinkCache::start_with_clock(INTERVAL, TTL, clock.clone());

        tokio::time::sleep(INTERVAL * 2).await;
        assert!(!sweeper.is_finished());

        sweeper.shutdown().await;

        cache.put("abc123", "http://example.com/a");
        clock.advance(TimeDelta::seconds(60));
        tokio::time::sleep(INTERVAL * 3).await;

        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_task() {
        let cache = Arc::new(LinkCache::new(TTL));
        let sweeper = spawn_sweeper(cache, INTERVAL);
        assert!(!sweeper.is_finished());
        let Sweeper { stop, handle } = sweeper;

        drop(stop);

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("sweeper should exit once the stop channel closes")
            .unwrap();
    }
}
