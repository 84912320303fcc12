use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use relink_core::ShortenerError;
use relink_redirector::RedirectorError;
use thiserror::Error;
use tracing::error;

use crate::model::ErrorResponse;
use crate::render::RenderError;
use crate::target::TargetError;

pub type Result<T> = std::result::Result<T, AppError>;

/// Body of a 404 from the redirect endpoint.
pub const LINK_NOT_FOUND_TEXT: &str = "Link not found or expired.";

const ID_NOT_FOUND: &str = "QR Code ID not found";
const INTERNAL: &str = "Internal server error";
const RENDER_FAILED: &str = "Error generating QR code";

/// Errors surfaced by the HTTP handlers.
///
/// Client mistakes are answered with their message. Server-side failures are
/// logged here and answered with a fixed message that leaks no detail.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("link not found")]
    LinkNotFound,
    #[error(transparent)]
    Target(#[from] TargetError),
    #[error(transparent)]
    Shortener(#[from] ShortenerError),
    #[error(transparent)]
    Redirector(#[from] RedirectorError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("stored target is not a valid redirect location: {0}")]
    InvalidLocation(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(message) => json_error(StatusCode::BAD_REQUEST, message),
            AppError::LinkNotFound => (StatusCode::NOT_FOUND, LINK_NOT_FOUND_TEXT).into_response(),
            AppError::Target(e) => json_error(StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Shortener(ShortenerError::InvalidUrl(message)) => {
                json_error(StatusCode::BAD_REQUEST, format!("invalid url: {message}"))
            }
            AppError::Shortener(
                ShortenerError::NotFound(_) | ShortenerError::InvalidShortCode(_),
            ) => json_error(StatusCode::NOT_FOUND, ID_NOT_FOUND),
            AppError::Shortener(
                e @ (ShortenerError::AllocationExhausted(_) | ShortenerError::Storage(_)),
            ) => {
                error!(error = %e, "link operation failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
            }
            AppError::Redirector(e) => {
                error!(error = %e, "redirect resolution failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
            }
            e @ AppError::InvalidLocation(_) => {
                error!(error = %e, "redirect location rejected");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
            }
            AppError::Render(e) => {
                error!(error = %e, "qr code rendering failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, RENDER_FAILED)
            }
        }
    }
}
