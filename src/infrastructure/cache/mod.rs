//! In-memory caching layer for short link lookups.
//!
//! - [`LinkCache`] - Concurrent short ID ↔ long URL cache with idle-time eviction
//! - [`Sweeper`] - Background task that periodically evicts idle entries
//! - [`Clock`] - Time source abstraction ([`SystemClock`], [`ManualClock`])

mod clock;
mod entry;
mod link_cache;
mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use link_cache::LinkCache;
pub use sweeper::{Sweeper, spawn_sweeper};
