//! Database connection pool management.
//!
//! The gateway holds a single process-wide pool. It is created once by
//! [`init_pool`] before traffic is served and closed by [`close_pool`] after
//! the server has drained.

use sqlx::mysql::MySqlPoolOptions;
use sqlx::{Executor, MySqlPool};
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::config::DbConfig;
use crate::executor::map_sqlx_error;
use error::DatabaseError;

/// Type alias for MySQL connection pool.
pub type DbPool = MySqlPool;

static POOL: OnceCell<DbPool> = OnceCell::const_new();

/// Create a new database connection pool.
///
/// Every connection runs with auto-commit enabled; no statement issued
/// through the pool is wrapped in an explicit transaction.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, DatabaseError> {
    tracing::info!("Creating database pool: {}", config.target());

    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET autocommit = 1").await?;
                Ok(())
            })
        })
        .connect_with(config.connect_options())
        .await
        .map_err(|e| {
            tracing::error!("Failed to create database pool: {}", e);
            DatabaseError::ConnectionFailed(e.to_string())
        })?;

    tracing::info!("Database pool created successfully");
    Ok(pool)
}

/// Initialize the shared pool, or return it if already initialized.
///
/// Concurrent callers wait on a single initialization. Once a pool exists the
/// `config` argument of later calls is ignored. A failed attempt leaves the
/// pool unset so a later call may retry.
pub async fn init_pool(config: &DbConfig) -> Result<&'static DbPool, DatabaseError> {
    POOL.get_or_try_init(|| create_pool(config)).await
}

/// Close the shared pool, waiting for checked-out connections to be returned.
///
/// Does nothing if the pool was never initialized or is already closed.
pub async fn close_pool() {
    if let Some(pool) = POOL.get() {
        if !pool.is_closed() {
            tracing::info!("Closing database pool");
            pool.close().await;
            tracing::info!("Database pool closed");
        }
    }
}

/// Check if the database connection is healthy.
pub async fn health_check(pool: &DbPool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(map_sqlx_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> DbConfig {
        DbConfig::new("127.0.0.1", 1, "none", "nobody", "")
            .with_min_connections(0)
            .with_connect_timeout(1)
    }

    // Only the database-backed test below ever fills the shared pool.

    #[tokio::test]
    async fn test_close_without_init_is_noop() {
        close_pool().await;
        assert!(POOL.get().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_database_fails_fast() {
        let result = create_pool(&unreachable_config()).await;
        assert!(matches!(result, Err(DatabaseError::ConnectionFailed(_))));
    }

    #[tokio::test]
    async fn test_failed_init_leaves_pool_unset() {
        let result = init_pool(&unreachable_config()).await;
        assert!(matches!(result, Err(DatabaseError::ConnectionFailed(_))));
        assert!(POOL.get().is_none());

        // A later attempt runs again instead of reusing the failure
        let retry = init_pool(&unreachable_config()).await;
        assert!(matches!(retry, Err(DatabaseError::ConnectionFailed(_))));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_init_pool_returns_same_instance() {
        let config = DbConfig::from_env().expect("DB_* variables required");
        let first = init_pool(&config).await.expect("pool creation failed");
        let second = init_pool(&config).await.expect("pool lookup failed");
        assert!(std::ptr::eq(first, second));
        health_check(first).await.expect("health check failed");
        close_pool().await;
        assert!(first.is_closed());
    }
}
