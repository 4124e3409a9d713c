//! Shipment endpoints

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use envio_service::{Envio, EnvioInput, EnvioOut, MessageResponse};

use crate::error::ApiError;
use crate::router::AppState;

/// GET /api/v1/envios
pub async fn list_envios(State(state): State<AppState>) -> Result<Json<Vec<EnvioOut>>, ApiError> {
    Ok(Json(state.service.list_envios().await?))
}

/// GET /api/v1/envio/:envio_id
pub async fn get_envio(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<EnvioOut>, ApiError> {
    let Path(envio_id) = path?;
    Ok(Json(state.service.get_envio(envio_id).await?))
}

/// POST /api/v1/envio
pub async fn create_envio(
    State(state): State<AppState>,
    payload: Result<Json<EnvioInput>, JsonRejection>,
) -> Result<Json<Envio>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(state.service.create_envio(input).await?))
}

/// PUT /api/v1/envio/:envio_id
pub async fn update_envio(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<EnvioInput>, JsonRejection>,
) -> Result<Json<Envio>, ApiError> {
    let Path(envio_id) = path?;
    let Json(input) = payload?;
    Ok(Json(state.service.update_envio(envio_id, input).await?))
}

/// DELETE /api/v1/envio/:envio_id
pub async fn delete_envio(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(envio_id) = path?;
    Ok(Json(state.service.delete_envio(envio_id).await?))
}
