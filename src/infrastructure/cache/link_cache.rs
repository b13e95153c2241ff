//! In-process, self-evicting short ID cache.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use super::entry::CacheEntry;
use super::sweeper::{Sweeper, spawn_sweeper};

/// Concurrent short ID → long URL cache with a reverse index and idle-time eviction.
///
/// Entries live in a sharded [`DashMap`], so operations on different short IDs do not
/// contend on a global lock. A second map indexes long URL → short IDs; it is only ever
/// modified while the shard lock of the owning entry is held (entry lock first, index
/// lock second), which keeps the two maps in agreement for every key.
///
/// # Refresh policy
///
/// [`LinkCache::get`] does not refresh `last_accessed`. Callers refresh explicitly
/// with [`LinkCache::touch`] or by re-inserting with [`LinkCache::put`].
pub struct LinkCache {
    entries: DashMap<String, CacheEntry>,
    by_long_url: DashMap<String, HashSet<String>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl LinkCache {
    /// Creates an empty cache using the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Creates an empty cache reading time from `clock`.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            by_long_url: DashMap::new(),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            clock,
        }
    }

    /// Builds a cache and spawns its background sweeper.
    ///
    /// Must be called from within a Tokio runtime. Keep the returned [`Sweeper`]
    /// alive for as long as the cache should be swept.
    pub fn start(evict_interval: Duration, ttl: Duration) -> (Arc<Self>, Sweeper) {
        Self::start_with_clock(evict_interval, ttl, Arc::new(SystemClock))
    }

    /// Same as [`LinkCache::start`] with an explicit time source.
    pub fn start_with_clock(
        evict_interval: Duration,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> (Arc<Self>, Sweeper) {
        if ttl < evict_interval {
            warn!(
                "Cache TTL ({:?}) is shorter than the eviction interval ({:?}); \
                 entries will live up to one interval",
                ttl, evict_interval
            );
        }

        let cache = Arc::new(Self::with_clock(ttl, clock));
        let sweeper = spawn_sweeper(cache.clone(), evict_interval);
        (cache, sweeper)
    }

    /// Inserts or overwrites the entry for `short_id`, stamping it with the current time.
    pub fn put(&self, short_id: &str, long_url: &str) {
        let entry = CacheEntry::new(long_url.to_string(), self.clock.now());

        match self.entries.entry(short_id.to_string()) {
            Entry::Occupied(mut occupied) => {
                let previous = occupied.insert(entry);
                if previous.long_url != long_url {
                    self.unlink(&previous.long_url, short_id);
                    self.link(long_url, short_id);
                }
            }
            Entry::Vacant(vacant) => {
                self.link(long_url, short_id);
                vacant.insert(entry);
            }
        }

        debug!("Cache PUT: {} -> {}", short_id, long_url);
    }

    /// Point lookup. Does not refresh the access time.
    pub fn get(&self, short_id: &str) -> Option<String> {
        self.entries.get(short_id).map(|e| e.long_url.clone())
    }

    /// Refreshes the access time of `short_id`.
    ///
    /// Returns `false` if the entry is no longer cached.
    pub fn touch(&self, short_id: &str) -> bool {
        let now = self.clock.now();

        match self.entries.get_mut(short_id) {
            Some(mut entry) => {
                entry.last_accessed = now;
                true
            }
            None => false,
        }
    }

    /// Reverse lookup: a short ID currently cached for `long_url`.
    ///
    /// If several short IDs map to the same URL, any one of them may be returned.
    pub fn find_by_long_url(&self, long_url: &str) -> Option<String> {
        let candidates: Vec<String> = self
            .by_long_url
            .get(long_url)?
            .iter()
            .cloned()
            .collect();

        candidates.into_iter().find(|short_id| {
            self.entries
                .get(short_id)
                .is_some_and(|e| e.long_url == long_url)
        })
    }

    /// Removes the entry for `short_id`. Returns whether anything was removed.
    pub fn delete(&self, short_id: &str) -> bool {
        match self.entries.entry(short_id.to_string()) {
            Entry::Occupied(occupied) => {
                self.unlink(&occupied.get().long_url, short_id);
                occupied.remove();
                true
            }
            Entry::Vacant(_) => false,
        }
    }

    /// Visits every entry.
    ///
    /// Weakly consistent: entries inserted or removed concurrently may or may not be
    /// seen. The callback runs while a shard read lock is held and must not call back
    /// into this cache.
    pub fn for_each(&self, mut f: impl FnMut(&str, &CacheEntry)) {
        for item in self.entries.iter() {
            f(item.key(), item.value());
        }
    }

    /// Removes every entry idle for longer than the TTL. Returns how many were evicted.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;

        self.entries.retain(|short_id, entry| {
            if entry.is_stale(now, self.ttl) {
                info!(
                    "(Cache expiry) {}: {} has been evicted from the cache",
                    short_id, entry.long_url
                );
                self.unlink(&entry.long_url, short_id);
                removed += 1;
                false
            } else {
                true
            }
        });

        removed
    }

    /// Last access time of `short_id`, if cached.
    pub fn last_accessed(&self, short_id: &str) -> Option<DateTime<Utc>> {
        self.entries.get(short_id).map(|e| e.last_accessed)
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn link(&self, long_url: &str, short_id: &str) {
        self.by_long_url
            .entry(long_url.to_string())
            .or_default()
            .insert(short_id.to_string());
    }

    fn unlink(&self, long_url: &str, short_id: &str) {
        if let Some(mut ids) = self.by_long_url.get_mut(long_url) {
            ids.remove(short_id);
        }
        self.by_long_url.remove_if(long_url, |_, ids| ids.is_empty());
    }
}
