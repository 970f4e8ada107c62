//! Error types for the catalog service

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::models::book::{BookValidationError, Violation};

/// Machine-readable error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    DbFailure = 3,
    NoSuchBook = 5,
    BookAlreadyExists = 16,
    BadValue = 18,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("A book with ISBN {0} was not found.")]
    BookNotFound(String),

    #[error("A book with ISBN {0} already exists.")]
    BookAlreadyExists(String),

    #[error(transparent)]
    Validation(#[from] BookValidationError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// Every failed validation rule, present on 400 responses for invalid books
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, violations) = match &self {
            AppError::BookNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchBook, Vec::new()),
            AppError::BookAlreadyExists(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::BookAlreadyExists,
                Vec::new(),
            ),
            AppError::Validation(err) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, err.violations.clone())
            }
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, Vec::new()),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DbFailure, Vec::new())
            }
        };

        let message = match &self {
            AppError::Database(_) => "Database error".to_string(),
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            violations,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Book;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::BookNotFound("1234567890".into()), StatusCode::NOT_FOUND),
            (AppError::BookAlreadyExists("1234567890".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::BadRequest("broken".into()), StatusCode::BAD_REQUEST),
            (AppError::Database(sqlx::Error::PoolTimedOut), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = Book::build(None, None, None, None).unwrap_err();
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_domain_messages() {
        assert_eq!(
            AppError::BookNotFound("1234567890".into()).to_string(),
            "A book with ISBN 1234567890 was not found."
        );
        assert_eq!(
            AppError::BookAlreadyExists("1234567890".into()).to_string(),
            "A book with ISBN 1234567890 already exists."
        );
    }
}
