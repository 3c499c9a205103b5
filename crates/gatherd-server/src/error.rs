use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Payload failed validation")]
    Validation(HashMap<String, String>),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Community does not exist")]
    UnknownCommunity,

    #[error("Dependency failure: {0}")]
    Dependency(String),

    #[error("Data integrity violation: {0}")]
    Integrity(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Field-level error map, one entry per offending field
            AppError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!(errors))).into_response()
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
            }
            AppError::Conflict(msg) => {
                (StatusCode::CONFLICT, Json(json!({ "error": msg }))).into_response()
            }
            AppError::UnknownCommunity => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Community does not exist" })),
            )
                .into_response(),
            AppError::Dependency(msg) => {
                tracing::error!("Dependency failure: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "error": "Upstream dependency failure" })),
                )
                    .into_response()
            }
            AppError::Integrity(msg) => {
                tracing::error!("Data integrity violation: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
