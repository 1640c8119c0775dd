//! Typed errors and HTTP mapping.

use crate::service::Violation;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("database url: {0}")]
    DatabaseUrl(#[source] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("invalid request body: {}", summarize(.0))]
    Validation(Vec<Violation>),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("request body too large")]
    PayloadTooLarge,
    #[error("connection acquisition: {0}")]
    Acquire(#[source] sqlx::Error),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl From<Vec<Violation>> for AppError {
    fn from(violations: Vec<Violation>) -> Self {
        AppError::Validation(violations)
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| {
            if v.field.is_empty() {
                v.message.clone()
            } else {
                format!("{} {}", v.field, v.message)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub message: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<Violation>>,
    /// Opaque id for server-side failures; the same id is logged with the cause.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<Uuid>,
}

impl AppError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
            AppError::Acquire(_) => (StatusCode::INTERNAL_SERVER_ERROR, "connection_unavailable"),
            AppError::Db(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = match self {
            AppError::Acquire(ref e) => {
                let reference = Uuid::new_v4();
                tracing::error!(%reference, error = %e, "could not acquire database connection");
                ErrorBody {
                    message: "database connection unavailable".into(),
                    code,
                    violations: None,
                    reference: Some(reference),
                }
            }
            AppError::Db(ref e) => {
                let reference = Uuid::new_v4();
                tracing::error!(%reference, error = %e, "query failed");
                ErrorBody {
                    message: "internal error".into(),
                    code,
                    violations: None,
                    reference: Some(reference),
                }
            }
            AppError::Validation(violations) => {
                let message = format!("invalid request body: {}", summarize(&violations));
                tracing::debug!(%message, "rejected request");
                ErrorBody {
                    message,
                    code,
                    violations: Some(violations),
                    reference: None,
                }
            }
            other => {
                tracing::debug!(error = %other, "rejected request");
                ErrorBody {
                    message: other.to_string(),
                    code,
                    violations: None,
                    reference: None,
                }
            }
        };
        (status, Json(body)).into_response()
    }
}
