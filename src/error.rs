use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

use crate::response::{ErrorBody, FieldError};

/// Every failure a handler can return. Rendered as the JSON failure envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    TooManyRequests(String),
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    // Status and the message safe to show the client. Database details stay in the logs.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
            ApiError::TooManyRequests(m) => (StatusCode::TOO_MANY_REQUESTS, m.clone()),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            ),
            ApiError::Database(e) => match e {
                DbErr::RecordNotFound(_) => (StatusCode::NOT_FOUND, "Record not found".to_string()),
                DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Database connection error".to_string(),
                ),
                _ => match e.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) => {
                        (StatusCode::CONFLICT, "Record already exists".to_string())
                    }
                    Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                        (StatusCode::BAD_REQUEST, "Related record not found".to_string())
                    }
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Database operation failed".to_string(),
                    ),
                },
            },
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status_and_message().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let errors = match self {
            ApiError::Validation(fields) => Some(fields.clone()),
            _ => None,
        };

        HttpResponse::build(status).json(ErrorBody::new(message, errors))
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    field: field_name(&field, e),
                    message: e
                        .message
                        .as_ref()
                        .map_or_else(|| e.code.to_string(), ToString::to_string),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::Validation(fields)
    }
}

// Struct-level checks report under `__all__` and name the field in their code.
fn field_name(field: &str, error: &ValidationError) -> String {
    if field == "__all__" {
        return error.code.to_string();
    }

    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
