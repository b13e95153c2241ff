//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The URL to shorten. A missing scheme defaults to `http://`.
    #[validate(length(min = 1, max = 2048, message = "long_url must be 1-2048 characters"))]
    pub long_url: String,
}

/// Successful shortening result.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub short_url: String,
    pub short_id: String,
    /// Canonical form the short ID maps to.
    pub long_url: String,
}
