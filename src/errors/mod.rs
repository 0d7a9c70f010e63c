//! Unified error handling with consistent API response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use validator::ValidationErrors;

/// A single field-level constraint violation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Flatten `validator` output into a sorted field-level violation list.
    pub fn from_validation(errors: &ValidationErrors) -> Vec<Self> {
        let mut details: Vec<Self> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid value for {field}"));
                    Self::new(field.clone(), message)
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));
        details
    }
}

/// Error detail in the API response envelope.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldViolation>,
}

/// Consistent JSON envelope for all API responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a successful result in the envelope.
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            data: Some(data),
            error: None,
        })
    }
}

/// Application error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The target resource of a read/delete does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The owning resource referenced by an operation does not exist.
    /// Reported distinctly from [`AppError::NotFound`]: for updates, a
    /// missing child resource triggers the create-with-id path, while a
    /// missing parent is terminal for the request.
    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    /// Malformed request detected before any repository interaction.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Payload or patched view failed field constraints; recoverable by
    /// resubmission, never persisted.
    #[error("Unprocessable entity")]
    Unprocessable(Vec<FieldViolation>),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Persistence failure surfaced by the store; not retried internally.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Check if this error represents a not-found condition (parent or target).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::ParentNotFound(_))
    }

    /// Check if this error represents a field-validation failure.
    pub fn is_unprocessable(&self) -> bool {
        matches!(self, Self::Unprocessable(_))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Unprocessable(FieldViolation::from_validation(&errors))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, vec![]),
            AppError::ParentNotFound(msg) => {
                (StatusCode::NOT_FOUND, "PARENT_NOT_FOUND", msg, vec![])
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg, vec![]),
            AppError::Unprocessable(details) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                "One or more fields failed validation".to_string(),
                details,
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg, vec![]),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    vec![],
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    vec![],
                )
            }
        };

        let body = ApiResponse::<()> {
            data: None,
            error: Some(ApiError {
                code: code.to_string(),
                message,
                details,
            }),
        };

        (status, Json(body)).into_response()
    }
}
