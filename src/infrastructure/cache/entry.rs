//! A single cached mapping.

use chrono::{DateTime, TimeDelta, Utc};

/// Cached long URL for one short ID, with the time it was last used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub long_url: String,
    pub last_accessed: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(long_url: String, now: DateTime<Utc>) -> Self {
        Self {
            long_url,
            last_accessed: now,
        }
    }

    /// How long the entry has gone untouched as of `now`.
    pub fn idle_for(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.last_accessed
    }

    /// True once the idle time is strictly greater than `ttl`.
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        self.idle_for(now) > ttl
    }
}
