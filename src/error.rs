//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::cache::CacheError;
use crate::config::ConfigError;
use crate::players::PlayerRepositoryError;
use crate::queue::QueueError;
use crate::rates::RateSourceError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("No statistics recorded for player {0}")]
    PlayerNotFound(i64),

    // Dependency errors
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Rate source error: {0}")]
    RateSource(#[from] RateSourceError),

    #[error("Player repository error: {0}")]
    PlayerRepository(#[from] PlayerRepositoryError),

    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // Startup errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Timed out after {0}s waiting for dependencies")]
    StartupTimeout(u64),

    #[error("Database schema is incomplete: missing table '{0}'")]
    SchemaIncomplete(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            // 404 Not Found
            AppError::PlayerNotFound(id) => {
                (StatusCode::NOT_FOUND, "player_not_found", Some(id.to_string()))
            }

            // 503 Service Unavailable
            AppError::Cache(e) => {
                tracing::error!("Cache error: {:?}", e);
                (StatusCode::SERVICE_UNAVAILABLE, "cache_error", None)
            }
            AppError::RateSource(e) => {
                tracing::error!("Rate source error: {:?}", e);
                (StatusCode::SERVICE_UNAVAILABLE, "rate_source_error", None)
            }
            AppError::PlayerRepository(e) => {
                tracing::error!("Player repository error: {:?}", e);
                (StatusCode::SERVICE_UNAVAILABLE, "player_repository_error", None)
            }
            AppError::Queue(e) => {
                tracing::error!("Queue error: {:?}", e);
                (StatusCode::SERVICE_UNAVAILABLE, "queue_error", None)
            }

            // 500 Internal Server Error
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Config(e) => {
                tracing::error!("Config error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error", None)
            }
            AppError::StartupTimeout(_) | AppError::SchemaIncomplete(_) => {
                tracing::error!("Startup error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "startup_error", None)
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
