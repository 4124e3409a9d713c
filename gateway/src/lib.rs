//! Gateway library
//!
//! HTTP surface of the shipment service. The binary wires these pieces
//! together; tests drive the router in-process.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use config::GatewayConfig;
pub use error::ApiError;
pub use router::{build_router, AppState};
