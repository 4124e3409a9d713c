//! Envío Service
//!
//! This crate provides shipment management: domain records, the typed row
//! decoders for the stored procedures, the repository seam and the service
//! the gateway calls in-process.

pub mod models;
pub mod repository;
pub mod service;

pub use models::{Envio, EnvioInput, EnvioOut, EstadoEnvio, MessageResponse, Repartidor};
pub use repository::{EnvioRepository, InMemoryRepository, MySqlRepository};
pub use service::{EnvioService, ENVIO_NOT_FOUND};
