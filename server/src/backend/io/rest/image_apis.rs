//! # REST API for Image Uploads
//!
//! The request body is the raw image; its `Content-Type` must be `image/*`.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use log::info;
use shared::ImageUploadResponse;

use super::error::ApiError;
use crate::backend::AppState;

pub async fn upload_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    info!(
        "POST /api/images - {} bytes, content type {:?}",
        body.len(),
        content_type
    );

    let image_url = state.image_service.upload_image(content_type, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(ImageUploadResponse { image_url }),
    ))
}
