//! Lookup lists used to fill combo boxes

use axum::extract::State;
use axum::Json;
use envio_service::{EstadoEnvio, Repartidor};

use crate::error::ApiError;
use crate::router::AppState;

/// GET /api/v1/repartidores
pub async fn list_repartidores(
    State(state): State<AppState>,
) -> Result<Json<Vec<Repartidor>>, ApiError> {
    Ok(Json(state.service.list_repartidores().await?))
}

/// GET /api/v1/estados_envio
pub async fn list_estados_envio(
    State(state): State<AppState>,
) -> Result<Json<Vec<EstadoEnvio>>, ApiError> {
    Ok(Json(state.service.list_estados_envio().await?))
}
