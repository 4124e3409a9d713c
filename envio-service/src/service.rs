//! Shipment service
//!
//! Operations behind the HTTP endpoints. Each one is a single repository call;
//! the service turns an absent row into `AppError::NotFound` and shapes the
//! responses.

use std::sync::Arc;

use error::{AppError, DatabaseError, Result};

use crate::models::{Envio, EnvioInput, EnvioOut, EstadoEnvio, MessageResponse, Repartidor};
use crate::repository::EnvioRepository;

/// Message returned when a shipment id has no row.
pub const ENVIO_NOT_FOUND: &str = "Envío no encontrado";

/// Shipment service for business operations
#[derive(Clone)]
pub struct EnvioService {
    repository: Arc<dyn EnvioRepository>,
}

impl EnvioService {
    /// Create a new shipment service over the given repository
    pub fn new(repository: Arc<dyn EnvioRepository>) -> Self {
        Self { repository }
    }

    /// List all delivery people
    pub async fn list_repartidores(&self) -> Result<Vec<Repartidor>> {
        Ok(self.repository.list_repartidores().await?)
    }

    /// List all shipment statuses
    pub async fn list_estados_envio(&self) -> Result<Vec<EstadoEnvio>> {
        Ok(self.repository.list_estados_envio().await?)
    }

    /// List all shipments
    pub async fn list_envios(&self) -> Result<Vec<EnvioOut>> {
        Ok(self.repository.list_envios().await?)
    }

    /// Get one shipment
    pub async fn get_envio(&self, envio_id: i64) -> Result<EnvioOut> {
        self.repository
            .find_envio(envio_id)
            .await?
            .ok_or_else(|| AppError::NotFound(ENVIO_NOT_FOUND.to_string()))
    }

    /// Create a shipment and echo it back with its new id
    pub async fn create_envio(&self, input: EnvioInput) -> Result<Envio> {
        let envio_id = self.repository.create_envio(&input).await?;
        tracing::info!(envio_id, "Shipment created");
        Ok(Envio::from_input(envio_id, input))
    }

    /// Update a shipment and echo the written fields
    pub async fn update_envio(&self, envio_id: i64, input: EnvioInput) -> Result<Envio> {
        self.repository.update_envio(envio_id, &input).await?;
        tracing::info!(envio_id, "Shipment updated");
        Ok(Envio::from_input(envio_id, input))
    }

    /// Delete a shipment
    pub async fn delete_envio(&self, envio_id: i64) -> Result<MessageResponse> {
        self.repository.delete_envio(envio_id).await?;
        tracing::info!(envio_id, "Shipment deleted");
        Ok(MessageResponse::new(format!(
            "Envío con ID {} eliminado correctamente.",
            envio_id
        )))
    }

    /// Check that the database answers
    pub async fn health_check(&self) -> std::result::Result<(), DatabaseError> {
        self.repository.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;
    use chrono::NaiveDate;

    fn service() -> EnvioService {
        EnvioService::new(Arc::new(InMemoryRepository::default()))
    }

    fn input() -> EnvioInput {
        EnvioInput {
            remitente: "A".to_string(),
            destinatario: "B".to_string(),
            direccion_envio: "X".to_string(),
            fecha_envio: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            repartidor_id: 1,
            estado_id: 1,
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let service = service();

        let created = service.create_envio(input()).await.unwrap();
        assert!(created.envio_id > 0);
        assert_eq!(created.remitente, "A");
        assert_eq!(created.estado_id, 1);

        let envio = service.get_envio(created.envio_id).await.unwrap();
        assert_eq!(envio.direccion_envio, "X");
        assert_eq!(envio.estado, "Pendiente");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let result = service().get_envio(404).await;
        assert!(matches!(result, Err(AppError::NotFound(ref m)) if m == ENVIO_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let service = service();
        let created = service.create_envio(input()).await.unwrap();

        let message = service.delete_envio(created.envio_id).await.unwrap();
        assert_eq!(
            message.message,
            format!("Envío con ID {} eliminado correctamente.", created.envio_id)
        );
        assert!(matches!(
            service.get_envio(created.envio_id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_echoes_input() {
        let service = service();
        let created = service.create_envio(input()).await.unwrap();

        let mut changed = input();
        changed.remitente = "Z".to_string();
        let updated = service.update_envio(created.envio_id, changed).await.unwrap();
        assert_eq!(updated.envio_id, created.envio_id);
        assert_eq!(updated.remitente, "Z");

        let envio = service.get_envio(created.envio_id).await.unwrap();
        assert_eq!(envio.remitente, "Z");
    }

    #[tokio::test]
    async fn test_database_error_propagates() {
        let repo = Arc::new(InMemoryRepository::default());
        repo.set_available(false);
        let service = EnvioService::new(repo);

        assert!(matches!(
            service.list_envios().await,
            Err(AppError::Database(DatabaseError::ConnectionFailed(_)))
        ));
    }
}
