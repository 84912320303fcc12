use crate::error::{AppError, Result};
use crate::model::{GenerateRequest, GenerateResponse, InfoResponse, UpdateRequest, UpdateResponse};
use crate::state::AppState;
use crate::target::RequestOrigin;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use relink_core::{ShortCode, ShortenerError};

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_code(id: String) -> Result<ShortCode> {
    ShortCode::new(id.trim()).map_err(|_| AppError::Shortener(ShortenerError::NotFound(id)))
}

pub async fn generate_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>> {
    let Json(request) = payload?;
    let url = non_blank(request.url)
        .ok_or_else(|| AppError::Validation("URL is required".to_string()))?;

    // resolve the base before allocating so a bad request leaves no orphan link
    let base = state
        .targets()
        .base_url(RequestOrigin::from_headers(&headers))?;

    let record = state.shortener().shorten(&url).await?;
    let redirect_url = state
        .targets()
        .redirect_url(&base, &record.code, request.title.as_deref());
    let qr_code_image = state.renderer().render(redirect_url.as_str())?;

    Ok(Json(GenerateResponse {
        id: record.code.to_string(),
        redirect_url: redirect_url.to_string(),
        qr_code_image,
        target_url: record.target_url,
    }))
}

pub async fn update_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<UpdateResponse>> {
    let Json(request) = payload?;
    let (Some(id), Some(new_url)) = (non_blank(request.id), non_blank(request.new_url)) else {
        return Err(AppError::Validation(
            "ID and New URL are required".to_string(),
        ));
    };

    let code = parse_code(id)?;
    let record = state.shortener().retarget(&code, &new_url).await?;

    Ok(Json(UpdateResponse {
        success: true,
        id: record.code.to_string(),
        new_url: record.target_url,
    }))
}

pub async fn info_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<InfoResponse>> {
    let code = parse_code(id)?;
    let record = state.shortener().info(&code).await?;

    Ok(Json(record.into()))
}
