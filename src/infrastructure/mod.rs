//! Infrastructure layer for external integrations.
//!
//! - [`cache`] - In-memory link cache and its eviction sweeper
//! - [`persistence`] - SQLite repository implementations

pub mod cache;
pub mod persistence;
