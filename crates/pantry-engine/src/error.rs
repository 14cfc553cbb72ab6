//! # API Error Type
//!
//! Unified error envelope for the workflow services.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Error Flow in the Inventory Engine                     │
//! │                                                                         │
//! │  Frontend                      Rust Backend                             │
//! │  ────────                      ────────────                             │
//! │                                                                         │
//! │  invoke('adjust_stock')                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Workflow Service                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  ValidationError ─── "quantity must not be zero" ──┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  CoreError (conflict?) ── illegal transition ──── ApiError ────►│  │
//! │  │         │                                          ▲            │  │
//! │  │         ▼                                          │            │  │
//! │  │  DbError ─── constraint / busy / query failure ────┘            │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  try {                                                                  │
//! │    await invoke('adjust_stock')                                         │
//! │  } catch (e) {                                                          │
//! │    // e.message = "Product not found: 42"                               │
//! │    // e.code = "NOT_FOUND"                                              │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Conflicts Are Not Validation Errors
//! An illegal state-machine transition or a lost write race is a `CONFLICT`:
//! the request was well-formed, it just raced with (or repeated) an earlier
//! one. The frontend refreshes and retries for conflicts; it fixes the form
//! for validation errors.

use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

use pantry_core::{CoreError, ValidationError};
use pantry_db::DbError;

/// API error returned from workflow services.
///
/// ## Serialization
/// This is what the frontend receives when a call fails:
/// ```json
/// {
///   "code": "CONFLICT",
///   "message": "Transfer 12 is completed, cannot complete"
/// }
/// ```
#[derive(Debug, Clone, Error, Serialize, TS)]
#[error("[{code:?}] {message}")]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
///
/// ## Usage in Frontend
/// ```typescript
/// try {
///   await invoke('complete_transfer', { receipt });
/// } catch (e) {
///   switch (e.code) {
///     case 'CONFLICT':
///       refreshTransfer();  // someone else got there first
///       break;
///     case 'VALIDATION_ERROR':
///       showForm(e.message);
///       break;
///     default:
///       showError('An error occurred');
///   }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Request raced with or repeated a conflicting write (409)
    Conflict,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal error (500)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Conflict, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::UniqueViolation { field } => {
                ApiError::conflict(format!("Duplicate {}: already exists", field))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::CheckViolation { message } => {
                // A workflow clamp was bypassed and the schema backstop fired.
                tracing::error!("Check constraint violation: {}", message);
                ApiError::validation("Value out of permitted range")
            }
            DbError::Busy(e) => {
                // Already retried once by the ledger; surface as retryable.
                tracing::warn!("Database busy after retry: {}", e);
                ApiError::conflict("Database busy, please retry")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", id),
            CoreError::TransferNotFound(id) => ApiError::not_found("Transfer", id),
            CoreError::PurchaseItemNotFound(id) => {
                ApiError::not_found("Purchase order item", id)
            }
            CoreError::InvalidTransferStatus { .. } => ApiError::conflict(err.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Result type for workflow services.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================
