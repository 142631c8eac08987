//! Unified error handling for the HTTP layer and the services.
//!
//! Provides a single error type that services return and the gateway
//! converts into Axum responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Per-field messages, nested for nested objects: `{"profile": {"bio": ["..."]}}`
pub type FieldErrors = Map<String, Value>;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0}")]
    InvalidPage(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Invalid input")]
    InvalidFields(FieldErrors),

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<FieldErrors>,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "NOT_FOUND",
            AppError::InvalidPage(_) => "INVALID_PAGE",
            AppError::Validation(_) | AppError::InvalidFields(_) => "VALIDATION_ERROR",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound | AppError::InvalidPage(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::InvalidFields(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) | AppError::InvalidPage(msg) => msg.clone(),

            // Hide details for internal errors
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }

    /// Field messages, for validation failures
    pub fn fields(&self) -> Option<&FieldErrors> {
        match self {
            AppError::InvalidFields(fields) => Some(fields),
            _ => None,
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.user_message();
        let code = self.code().to_string();
        let fields = match self {
            AppError::InvalidFields(fields) => Some(fields),
            _ => None,
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message,
                fields,
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Validation Error Conversion
// =============================================================================

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::InvalidFields(field_errors(&errors))
    }
}

/// Flatten validator output into nested per-field message lists.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .errors()
        .iter()
        .map(|(field, kind)| {
            let value = match kind {
                ValidationErrorsKind::Field(errs) => Value::Array(
                    errs.iter()
                        .map(|e| {
                            let message = e
                                .message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| format!("{} is invalid", field));
                            Value::String(message)
                        })
                        .collect(),
                ),
                ValidationErrorsKind::Struct(inner) => Value::Object(field_errors(inner)),
                ValidationErrorsKind::List(items) => Value::Object(
                    items
                        .iter()
                        .map(|(index, inner)| (index.to_string(), Value::Object(field_errors(inner))))
                        .collect(),
                ),
            };
            (field.to_string(), value)
        })
        .collect()
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// Single message attached to one field
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(
            field.to_string(),
            Value::Array(vec![Value::String(message.into())]),
        );
        AppError::InvalidFields(fields)
    }

    pub fn invalid_page() -> Self {
        AppError::InvalidPage("Invalid page.".to_string())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
