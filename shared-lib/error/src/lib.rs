//! Common error types for the envios services.
//!
//! This crate provides unified error handling across the workspace.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Database-related errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Record not found")]
    NotFound,

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// A result row did not match the decoder for its query.
    #[error("Row decode failed: {0}")]
    Decode(String),
}

/// Configuration errors raised while loading settings at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(String),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Error response for API clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Add details to the error response.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl From<&DatabaseError> for ErrorResponse {
    fn from(err: &DatabaseError) -> Self {
        let (code, message) = match err {
            DatabaseError::ConnectionFailed(_) => ("DB_CONNECTION_FAILED", "Database connection failed"),
            DatabaseError::QueryFailed(_) => ("DB_QUERY_FAILED", "Database query failed"),
            DatabaseError::NotFound => ("DB_NOT_FOUND", "Record not found"),
            DatabaseError::DuplicateEntry(_) => ("DB_DUPLICATE_ENTRY", "Duplicate entry"),
            DatabaseError::Decode(_) => ("DB_DECODE_FAILED", "Unexpected result shape"),
        };
        Self::new(code, message)
    }
}

/// Internal causes are never copied into the body; only client-facing
/// variants carry their own text.
impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::Database(e) => Self::from(e),
            AppError::Config(_) => Self::new("CONFIG_INVALID", "Service misconfigured"),
            AppError::Validation(reason) => {
                Self::new("VALIDATION_FAILED", "Request validation failed").with_details(reason.clone())
            }
            AppError::NotFound(message) => Self::new("NOT_FOUND", message.clone()),
        }
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_keeps_message() {
        let err = AppError::NotFound("Envío no encontrado".to_string());
        let body = ErrorResponse::from(&err);
        assert_eq!(body.code, "NOT_FOUND");
        assert_eq!(body.message, "Envío no encontrado");
        assert!(body.details.is_none());
    }

    #[test]
    fn test_database_cause_is_not_exposed() {
        let err = AppError::from(DatabaseError::QueryFailed("secret table xyz".to_string()));
        let body = ErrorResponse::from(&err);
        assert_eq!(body.code, "DB_QUERY_FAILED");
        assert!(!body.message.contains("xyz"));
    }

    #[test]
    fn test_validation_carries_details() {
        let err = AppError::Validation("missing field `remitente`".to_string());
        let json = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(json["code"], "VALIDATION_FAILED");
        assert_eq!(json["details"], "missing field `remitente`");
    }

    #[test]
    fn test_details_omitted_when_absent() {
        let json = serde_json::to_value(ErrorResponse::new("X", "y")).unwrap();
        assert!(json.get("details").is_none());
    }
}
