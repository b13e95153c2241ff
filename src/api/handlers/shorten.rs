//! Handler for link shortening endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::url_normalizer::normalize_url;

/// Creates, or returns the existing, short URL for a long URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "long_url": "https://example.com/some/page" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "short_url": "http://localhost:8080/Xk3_9a-Q",
///   "short_id": "Xk3_9a-Q",
///   "long_url": "https://example.com/some/page"
/// }
/// ```
///
/// Shortening the same URL again returns the same `short_id`.
///
/// # Errors
///
/// Returns 400 Bad Request for a missing or malformed body, or an invalid URL.
/// Returns 500 Internal Server Error if the store fails.
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    })?;

    payload.validate()?;

    let long_url = normalize_url(&payload.long_url).map_err(|e| {
        AppError::bad_request(e.to_string(), json!({ "long_url": payload.long_url }))
    })?;

    let short_id = state.link_service.shorten(&long_url).await?;

    Ok(Json(ShortenResponse {
        short_url: state.short_url(&short_id),
        short_id,
        long_url,
    }))
}
