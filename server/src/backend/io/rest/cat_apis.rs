//! # REST API for Cat Profiles
//!
//! Listing, reading, creating, updating and deleting cats. Every route here
//! sits behind [`super::guard::require_session`].

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use log::info;
use shared::CatRequest;

use super::error::ApiError;
use super::mappers::CatMapper;
use crate::backend::domain::models::SessionUser;
use crate::backend::domain::DomainError;
use crate::backend::AppState;

/// List all cats
pub async fn list_cats(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/cats");

    let cats = state.cat_service.list_cats().await?;
    Ok(Json(CatMapper::to_cat_list_dto(cats)))
}

/// Get a cat by ID
pub async fn get_cat(
    State(state): State<AppState>,
    Path(cat_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/cats/{}", cat_id);

    match state.cat_service.get_cat(&cat_id).await? {
        Some(cat) => Ok(Json(CatMapper::to_dto(cat))),
        None => Err(DomainError::NotFound(format!("Cat {}", cat_id)).into()),
    }
}

pub async fn create_cat(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(request): Json<CatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!(
        "POST /api/cats by user {} - request: {:?}",
        user.id, request
    );

    let fields = CatMapper::to_fields(request)?;
    let cat = state.cat_service.create_cat(fields).await?;
    let message = format!("{} has been added", cat.name);
    Ok((
        StatusCode::CREATED,
        Json(CatMapper::to_cat_response_dto(cat, &message)),
    ))
}

/// Replace a cat's profile fields. Health records are left alone.
pub async fn update_cat(
    State(state): State<AppState>,
    Path(cat_id): Path<String>,
    Json(request): Json<CatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("PUT /api/cats/{} - request: {:?}", cat_id, request);

    let fields = CatMapper::to_fields(request)?;
    let cat = state.cat_service.update_cat(&cat_id, fields).await?;
    let message = format!("{} has been updated", cat.name);
    Ok(Json(CatMapper::to_cat_response_dto(cat, &message)))
}

pub async fn delete_cat(
    State(state): State<AppState>,
    Path(cat_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!("DELETE /api/cats/{}", cat_id);

    state.cat_service.delete_cat(&cat_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
