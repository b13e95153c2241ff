//! Core domain entities.
//!
//! - [`Link`] - A durable short ID to long URL mapping
//! - [`NewLink`] - Input for creating a link

pub mod link;

pub use link::{Link, NewLink};
