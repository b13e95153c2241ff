//! # PunyURL
//!
//! A small URL shortener built with Axum and SQLite, with an in-memory lookup cache
//! that evicts entries nobody has used recently.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Link entity and repository trait
//! - **Application Layer** ([`application`]) - Cache-then-store orchestration
//! - **Infrastructure Layer** ([`infrastructure`]) - Link cache, sweeper and SQLite persistence
//! - **API Layer** ([`api`]) - REST handlers, DTOs and middleware
//!
//! ## Request Flow
//!
//! `POST /shorten` and `GET /{short_id}` both consult the [`infrastructure::cache::LinkCache`]
//! first and fall back to the store on a miss. Every hit refreshes the entry's
//! last-access time; a background sweeper removes entries idle for longer than the TTL.
//! Eviction never loses data, because the store keeps every mapping.
//!
//! ## Quick Start
//!
//! ```bash
//! export DATABASE_URL="sqlite://puny-url.db?mode=rwc"
//! cargo run -- -e 1 --ttl 30 -p 8080
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::LinkService;
    pub use crate::domain::entities::{Link, NewLink};
    pub use crate::error::AppError;
    pub use crate::infrastructure::cache::{LinkCache, Sweeper};
    pub use crate::state::AppState;
}
