//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Error Flow in Till                            │
//! │                                                                     │
//! │  ValidationError ─┐                                                 │
//! │  CoreError ───────┼──► CheckoutError ──► ApiError { kind, message } │
//! │  DbError ─────────┘                            │                    │
//! │                                                ▼                    │
//! │                    {"error": {"kind": "conflict", "message": "…"}}  │
//! │                                                                     │
//! │  kind → status:  validation 400, not-found 404,                     │
//! │                  conflict 409, internal 500                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage details never leak to clients: anything that isn't a domain
//! outcome collapses to `internal` with a generic message, and the real
//! error goes to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use till_core::CoreError;
use till_db::{CheckoutError, DbError};

/// Machine-readable error category for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// Malformed or missing input (400). Rejected before any transaction.
    Validation,
    /// Unknown product or order (404).
    NotFound,
    /// Insufficient stock, or a reference still in use (409).
    Conflict,
    /// Storage or transaction failure (500).
    Internal,
}

/// API error returned from handlers.
///
/// ## Serialization
/// ```json
/// { "error": { "kind": "not-found", "message": "product not found: …" } }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ApiError {
            kind,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorKind::Validation, message)
    }

    /// Creates a not-found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorKind::NotFound, format!("{resource} not found: {id}"))
    }

    /// Creates an internal error with a generic client-facing message.
    pub fn internal() -> Self {
        ApiError::new(ErrorKind::Internal, "internal error")
    }

    fn status(&self) -> StatusCode {
        match self.kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({ "error": self });
        (status, axum::Json(body)).into_response()
    }
}

/// Converts domain errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("product", &id),
            CoreError::OrderNotFound(id) => ApiError::not_found("order", &id),
            CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorKind::Conflict, err.to_string())
            }
            CoreError::AmountOverflow { .. } => ApiError::validation(err.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorKind::Conflict,
                format!("duplicate {field}: '{value}' already exists"),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!(%message, "foreign key violation");
                ApiError::new(ErrorKind::Conflict, "record is still referenced")
            }
            other => {
                tracing::error!(error = %other, "database failure");
                ApiError::internal()
            }
        }
    }
}

/// Converts checkout errors to API errors.
impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Domain(e) => e.into(),
            CheckoutError::Db(e) => e.into(),
            CheckoutError::RollbackFailed { .. } => {
                tracing::error!(error = %err, "checkout rollback failed");
                ApiError::internal()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::NotFound).unwrap(),
            "\"not-found\""
        );
        assert_eq!(
            serde_json::to_string(&ErrorKind::Validation).unwrap(),
            "\"validation\""
        );
    }

    #[test]
    fn test_insufficient_stock_maps_to_conflict() {
        let api: ApiError = CoreError::InsufficientStock {
            product_id: "p-1".to_string(),
            available: 1,
            requested: 2,
        }
        .into();
        assert_eq!(api.kind, ErrorKind::Conflict);
    }

    #[test]
    fn test_validation_maps_to_validation() {
        let api: ApiError = CoreError::Validation(till_core::ValidationError::Required {
            field: "customer_id".to_string(),
        })
        .into();
        assert_eq!(api.kind, ErrorKind::Validation);
    }
}
