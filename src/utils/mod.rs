//! Helpers used by the HTTP layer and the link service.
//!
//! - [`code_generator`] - Short ID generation and validation
//! - [`url_normalizer`] - URL validation and canonicalization

pub mod code_generator;
pub mod url_normalizer;
