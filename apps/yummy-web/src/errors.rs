use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use recipe_backend_client::{BackendError, ConfigError, UnknownOption};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Input/output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Recipe backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Invalid input: {0}")]
    UnknownOption(#[from] UnknownOption),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::UnknownOption(e) => {
                warn!("Rejected unknown option: {}", e);
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            AppError::Backend(e) => {
                error!("Recipe backend error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Error communicating with recipe backend".to_string(),
                )
            }
            AppError::Io(e) => {
                error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal input/output error occurred".to_string(),
                )
            }
            AppError::Config(e) => {
                error!("Configuration error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal configuration error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
