//! In-memory repository for testing and development.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use error::DatabaseError;
use tokio::sync::RwLock;

use super::EnvioRepository;
use crate::models::{fecha, EnvioInput, EnvioOut, EstadoEnvio, Repartidor};

/// In-memory repository that joins shipments the way the listing procedures do.
///
/// Delivery people and statuses are fixed at construction. Unknown foreign
/// ids are rejected on write. Updating or deleting an id that does not exist
/// changes nothing and succeeds, like the SQL statements behind the procedures.
pub struct InMemoryRepository {
    repartidores: Vec<Repartidor>,
    estados: Vec<EstadoEnvio>,
    envios: RwLock<BTreeMap<i64, EnvioInput>>,
    next_id: AtomicI64,
    available: AtomicBool,
}

impl InMemoryRepository {
    pub fn new(repartidores: Vec<Repartidor>, estados: Vec<EstadoEnvio>) -> Self {
        Self {
            repartidores,
            estados,
            envios: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate losing (or regaining) the database connection.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), DatabaseError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DatabaseError::ConnectionFailed(
                "in-memory store marked unavailable".to_string(),
            ))
        }
    }

    fn check_references(&self, input: &EnvioInput) -> Result<(), DatabaseError> {
        if !self
            .repartidores
            .iter()
            .any(|r| r.repartidor_id == input.repartidor_id)
        {
            return Err(DatabaseError::QueryFailed(format!(
                "foreign key constraint fails: repartidor_id {}",
                input.repartidor_id
            )));
        }
        if !self.estados.iter().any(|e| e.estado_id == input.estado_id) {
            return Err(DatabaseError::QueryFailed(format!(
                "foreign key constraint fails: estado_id {}",
                input.estado_id
            )));
        }
        Ok(())
    }

    fn join(&self, envio_id: i64, input: &EnvioInput) -> Option<EnvioOut> {
        let repartidor = self
            .repartidores
            .iter()
            .find(|r| r.repartidor_id == input.repartidor_id)?;
        let estado = self
            .estados
            .iter()
            .find(|e| e.estado_id == input.estado_id)?;

        Some(EnvioOut {
            envio_id,
            remitente: input.remitente.clone(),
            destinatario: input.destinatario.clone(),
            direccion_envio: input.direccion_envio.clone(),
            fecha_envio: fecha::to_iso8601(&input.fecha_envio),
            nombre_repartidor: repartidor.nombre.clone(),
            apellido_repartidor: repartidor.apellido.clone(),
            estado: estado.nombre_estado.clone(),
        })
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        let repartidor = |id: i64, nombre: &str, apellido: &str, telefono: &str| Repartidor {
            repartidor_id: id,
            nombre: nombre.to_string(),
            apellido: apellido.to_string(),
            telefono: telefono.to_string(),
        };
        let estado = |id: i64, nombre: &str| EstadoEnvio {
            estado_id: id,
            nombre_estado: nombre.to_string(),
        };

        Self::new(
            vec![
                repartidor(1, "Luis", "Rojas", "987654321"),
                repartidor(2, "Ana", "Quispe", "912345678"),
            ],
            vec![
                estado(1, "Pendiente"),
                estado(2, "En camino"),
                estado(3, "Entregado"),
            ],
        )
    }
}

#[async_trait]
impl EnvioRepository for InMemoryRepository {
    async fn list_repartidores(&self) -> Result<Vec<Repartidor>, DatabaseError> {
        self.ensure_available()?;
        Ok(self.repartidores.clone())
    }

    async fn list_estados_envio(&self) -> Result<Vec<EstadoEnvio>, DatabaseError> {
        self.ensure_available()?;
        Ok(self.estados.clone())
    }

    async fn list_envios(&self) -> Result<Vec<EnvioOut>, DatabaseError> {
        self.ensure_available()?;
        let envios = self.envios.read().await;
        Ok(envios
            .iter()
            .filter_map(|(id, input)| self.join(*id, input))
            .collect())
    }

    async fn find_envio(&self, envio_id: i64) -> Result<Option<EnvioOut>, DatabaseError> {
        self.ensure_available()?;
        let envios = self.envios.read().await;
        Ok(envios
            .get(&envio_id)
            .and_then(|input| self.join(envio_id, input)))
    }

    async fn create_envio(&self, input: &EnvioInput) -> Result<i64, DatabaseError> {
        self.ensure_available()?;
        self.check_references(input)?;

        let mut envios = self.envios.write().await;
        let envio_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        envios.insert(envio_id, input.clone());
        Ok(envio_id)
    }

    async fn update_envio(&self, envio_id: i64, input: &EnvioInput) -> Result<(), DatabaseError> {
        self.ensure_available()?;

        let mut envios = self.envios.write().await;
        if let Some(existing) = envios.get_mut(&envio_id) {
            self.check_references(input)?;
            *existing = input.clone();
        }
        Ok(())
    }

    async fn delete_envio(&self, envio_id: i64) -> Result<(), DatabaseError> {
        self.ensure_available()?;
        self.envios.write().await.remove(&envio_id);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.ensure_available()
    }
}
