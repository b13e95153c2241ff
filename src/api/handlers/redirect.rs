//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::validate_short_id;

/// Redirects a short ID to its long URL.
///
/// # Endpoint
///
/// `GET /{short_id}`
///
/// # Request Flow
///
/// 1. Validate the short ID format
/// 2. Look it up in the cache, refreshing the entry on a hit
/// 3. On a cache miss, query the store and put the result back into the cache
/// 4. Return 302 Found
///
/// # Errors
///
/// Returns 400 Bad Request if the short ID is malformed.
/// Returns 404 Not Found if the short ID doesn't exist.
pub async fn redirect_handler(
    Path(short_id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    validate_short_id(&short_id)?;

    let long_url = state.link_service.resolve_or_not_found(&short_id).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, long_url)]))
}
