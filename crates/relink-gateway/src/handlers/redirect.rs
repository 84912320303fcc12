use crate::error::{AppError, Result};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use relink_core::ShortCode;
use url::Url;

/// Serializes a stored target as a `Location` value.
///
/// Targets are stored as submitted, so spaces and non-ASCII characters are
/// percent-encoded and IDN hosts punycoded here.
fn location(target_url: &str) -> Result<HeaderValue> {
    let url = Url::parse(target_url)
        .map_err(|e| AppError::InvalidLocation(format!("{target_url}: {e}")))?;

    HeaderValue::from_str(url.as_str())
        .map_err(|e| AppError::InvalidLocation(format!("{target_url}: {e}")))
}

pub async fn redirect_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    // a malformed code can never name a stored link
    let code = ShortCode::new(id.trim()).map_err(|_| AppError::LinkNotFound)?;

    match state.redirector().resolve(&code).await? {
        Some(record) => Ok((
            StatusCode::FOUND,
            [(header::LOCATION, location(&record.target_url)?)],
        )
            .into_response()),
        None => Err(AppError::LinkNotFound),
    }
}
