//! Application layer services implementing business logic.
//!
//! Services consume repository traits and the in-memory cache and provide a clean
//! API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation and resolution

pub mod services;
