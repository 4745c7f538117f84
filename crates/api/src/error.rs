//! API Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by the HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required fields: {0}")]
    MissingFields(String),

    #[error("Invalid sector. Use sector1, sector2, sector3, sector4, or sector5")]
    InvalidSector,

    #[error("No datasets found for category: {0}")]
    UnknownCategory(String),

    #[error("Access denied: Policy requirements not met for any records")]
    AccessDenied,

    #[error("Invalid reading: {0}")]
    Validation(#[from] sensor_data::ValidationError),

    #[error(transparent)]
    Storage(#[from] storage::StorageError),

    #[error(transparent)]
    Vault(#[from] data_vault::VaultError),

    #[error(transparent)]
    Audit(#[from] audit_log::AuditError),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFields(_) | ApiError::InvalidSector | ApiError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::UnknownCategory(_) => StatusCode::NOT_FOUND,
            ApiError::AccessDenied => StatusCode::FORBIDDEN,
            ApiError::Storage(_) | ApiError::Vault(_) | ApiError::Audit(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%self, "request failed");
        }
        (
            status,
            Json(ErrorBody {
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}
