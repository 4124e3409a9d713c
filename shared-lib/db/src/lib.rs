//! Database utilities and connection pooling for the envios services.
//!
//! This crate provides MySQL connection pool management using sqlx and a
//! small executor for parameterized stored-procedure calls.

mod config;
mod executor;
mod pool;

pub use config::DbConfig;
pub use executor::{acquire, execute, execute_on, ColumnDescriptor, QueryOutput, SqlParam};
pub use pool::{close_pool, create_pool, health_check, init_pool, DbPool};
