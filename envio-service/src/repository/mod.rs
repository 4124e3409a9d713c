//! Shipment repository
//!
//! Storage seam for shipments and their lookup tables. The production
//! implementation calls the stored procedures; the in-memory one stands in
//! for the database in tests.

mod memory;
mod mysql;

use async_trait::async_trait;
use error::DatabaseError;

use crate::models::{EnvioInput, EnvioOut, EstadoEnvio, Repartidor};

pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;

/// Shipment repository trait for database operations
#[async_trait]
pub trait EnvioRepository: Send + Sync {
    /// List every delivery person
    async fn list_repartidores(&self) -> Result<Vec<Repartidor>, DatabaseError>;

    /// List every shipment status
    async fn list_estados_envio(&self) -> Result<Vec<EstadoEnvio>, DatabaseError>;

    /// List every shipment, joined with delivery person and status
    async fn list_envios(&self) -> Result<Vec<EnvioOut>, DatabaseError>;

    /// Find one joined shipment by id
    async fn find_envio(&self, envio_id: i64) -> Result<Option<EnvioOut>, DatabaseError>;

    /// Create a shipment and return its assigned id
    async fn create_envio(&self, input: &EnvioInput) -> Result<i64, DatabaseError>;

    /// Overwrite a shipment's fields
    async fn update_envio(&self, envio_id: i64, input: &EnvioInput) -> Result<(), DatabaseError>;

    /// Delete a shipment
    async fn delete_envio(&self, envio_id: i64) -> Result<(), DatabaseError>;

    /// Check that the backing store is reachable
    async fn health_check(&self) -> Result<(), DatabaseError>;
}
