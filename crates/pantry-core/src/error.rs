//! # Error Types
//!
//! Domain-specific error types for pantry-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pantry-core errors (this file)                                         │
//! │  ├── CoreError        - Domain / state-machine errors                   │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  pantry-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                     │
//! │                                                                         │
//! │  pantry-engine errors                                                   │
//! │  └── ApiError         - {code, message} envelope the frontend sees      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Frontend      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ids, quantities)
//! 3. Errors are enum variants, never String
//! 4. Conflict-class errors (illegal transitions) are distinct from
//!    validation so the caller layer can map them to the right code

use thiserror::Error;

use crate::quantity::Quantity;
use crate::types::{MovementType, TransferStatus};

// =============================================================================
// Core Error
// =============================================================================

/// Domain logic errors.
///
/// These represent business rule violations or missing referents. They are
/// caught by the workflow layer and translated to user-facing messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Referenced product does not exist (or was soft-deleted).
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Referenced transfer does not exist.
    #[error("Transfer not found: {0}")]
    TransferNotFound(i64),

    /// Referenced purchase-order item does not exist.
    #[error("Purchase order item not found: {0}")]
    PurchaseItemNotFound(i64),

    /// Illegal state-machine transition on a transfer.
    ///
    /// ## When This Occurs
    /// - Completing or cancelling an already-terminal transfer
    /// - Dispatching a transfer that is not pending
    ///
    /// This is a conflict, not a validation error: the request was
    /// well-formed but raced with (or repeated) an earlier transition.
    #[error("Transfer {transfer_id} is {current}, cannot {attempted}")]
    InvalidTransferStatus {
        transfer_id: i64,
        current: TransferStatus,
        attempted: &'static str,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Malformed or out-of-policy input; surfaced with a human-readable message
/// and never retried automatically.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Movement quantity normalized to zero.
    #[error("Quantity must not be zero")]
    ZeroQuantity,

    /// A quantity that must be strictly positive was not.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Source and destination of a transfer are the same location.
    #[error("Source and destination locations must differ")]
    SameLocation,

    /// A transfer draft or receipt batch contains no items.
    #[error("At least one item is required")]
    EmptyItems,

    /// Received quantity outside the permitted clamp range.
    #[error("Received quantity {received} is outside [0, {max}]")]
    ReceivedOutOfRange { received: Quantity, max: Quantity },

    /// Nothing would be received across the whole batch.
    #[error("Total received quantity must be greater than zero")]
    NothingReceived,

    /// Expiry date attached to a movement type that cannot carry one.
    #[error("Expiry date is not allowed for {movement_type} movements")]
    ExpiryNotAllowed { movement_type: MovementType },

    /// Projected on-hand would go negative while negative stock is disabled.
    #[error("Operation would drive stock to {projected}, negative stock is disabled")]
    NegativeStockBlocked { projected: Quantity },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
