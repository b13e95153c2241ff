//! Short ID generation and validation.
//!
//! Provides cryptographically secure random ID generation behind the
//! [`CodeGenerator`] trait, and format validation for IDs arriving on the
//! redirect path.

use base64::Engine as _;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

use crate::error::AppError;

/// Length of random bytes before base64 encoding.
const CODE_LENGTH_BYTES: usize = 6;

/// Longest short ID accepted on the redirect path.
pub const MAX_SHORT_ID_LENGTH: usize = 64;

static SHORT_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("short ID regex is valid"));

/// Source of new short IDs.
///
/// Implementations are assumed to return IDs that have not been handed out before;
/// the store's primary key is the backstop if they don't.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Generates IDs from the operating system's random number generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_code()
    }
}

/// Generates a cryptographically secure random short ID.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, producing an 8-character ID.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
pub fn generate_code() -> String {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}

/// Checks that a short ID taken from a request path is well-formed.
///
/// # Rules
///
/// - Length: 1-64 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_` (the URL-safe base64 alphabet)
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_short_id(short_id: &str) -> Result<(), AppError> {
    if short_id.is_empty() || short_id.len() > MAX_SHORT_ID_LENGTH {
        return Err(AppError::bad_request(
            "Invalid ID",
            json!({ "reason": format!("length must be 1-{}", MAX_SHORT_ID_LENGTH) }),
        ));
    }

    if !SHORT_ID_REGEX.is_match(short_id) {
        return Err(AppError::bad_request(
            "Invalid ID",
            json!({ "reason": "only letters, digits, '-' and '_' are allowed" }),
        ));
    }

    Ok(())
}
