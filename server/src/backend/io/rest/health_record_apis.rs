//! # REST API for Health Records
//!
//! Weights, vet visits and vaccinations are nested under their cat.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;
use shared::{CreateVaccinationRequest, CreateVetVisitRequest, CreateWeightRequest};

use super::error::ApiError;
use super::mappers::CatMapper;
use crate::backend::AppState;

/// Weight history, oldest entry first
pub async fn get_weight_history(
    State(state): State<AppState>,
    Path(cat_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/cats/{}/weights", cat_id);

    let weights = state.health_record_service.weight_history(&cat_id).await?;
    Ok(Json(CatMapper::to_weight_history_dto(&cat_id, weights)))
}

pub async fn add_weight(
    State(state): State<AppState>,
    Path(cat_id): Path<String>,
    Json(request): Json<CreateWeightRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/cats/{}/weights - request: {:?}", cat_id, request);

    let weight = CatMapper::to_new_weight(request)?;
    let weight = state
        .health_record_service
        .add_weight(&cat_id, weight)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CatMapper::weight_to_dto(weight)),
    ))
}

pub async fn delete_weight(
    State(state): State<AppState>,
    Path((cat_id, weight_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    info!("DELETE /api/cats/{}/weights/{}", cat_id, weight_id);

    state
        .health_record_service
        .delete_weight(&cat_id, &weight_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_vet_visit(
    State(state): State<AppState>,
    Path(cat_id): Path<String>,
    Json(request): Json<CreateVetVisitRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!(
        "POST /api/cats/{}/vet-visits - request: {:?}",
        cat_id, request
    );

    let visit = CatMapper::to_new_vet_visit(request)?;
    let visit = state
        .health_record_service
        .add_vet_visit(&cat_id, visit)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CatMapper::vet_visit_to_dto(visit)),
    ))
}

pub async fn delete_vet_visit(
    State(state): State<AppState>,
    Path((cat_id, visit_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    info!("DELETE /api/cats/{}/vet-visits/{}", cat_id, visit_id);

    state
        .health_record_service
        .delete_vet_visit(&cat_id, &visit_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_vaccination(
    State(state): State<AppState>,
    Path(cat_id): Path<String>,
    Json(request): Json<CreateVaccinationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!(
        "POST /api/cats/{}/vaccinations - request: {:?}",
        cat_id, request
    );

    let vaccination = CatMapper::to_new_vaccination(request)?;
    let vaccination = state
        .health_record_service
        .add_vaccination(&cat_id, vaccination)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CatMapper::vaccination_to_dto(vaccination)),
    ))
}

pub async fn delete_vaccination(
    State(state): State<AppState>,
    Path((cat_id, vaccination_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    info!(
        "DELETE /api/cats/{}/vaccinations/{}",
        cat_id, vaccination_id
    );

    state
        .health_record_service
        .delete_vaccination(&cat_id, &vaccination_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
