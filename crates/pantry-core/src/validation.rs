//! # Validation Module
//!
//! Business rule validation for the four write workflows.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Form-level clamps and required fields                             │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Workflow service (Rust)                                      │
//! │  └── THIS MODULE: sign normalization, clamp re-validation,             │
//! │      state-machine legality; never trust the form                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::quantity::Quantity;
use crate::request::{AdjustmentRequest, TransferDraft};
use crate::MAX_TRANSFER_ITEMS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Adjustment
// =============================================================================

/// Validates an adjustment request and returns the normalized signed delta.
///
/// ## Rules
/// - The per-type sign convention is applied to the entered quantity
///   (see [`crate::types::MovementType::normalize`])
/// - A normalized zero is rejected
/// - An expiry date is accepted only on stock additions (purchase, or
///   adjustment with a positive normalized quantity)
///
/// ## Example
/// ```rust
/// use pantry_core::request::AdjustmentRequest;
/// use pantry_core::validation::normalize_adjustment;
/// use pantry_core::{MovementType, Quantity};
///
/// let req = AdjustmentRequest {
///     product_id: 1,
///     location_id: None,
///     movement_type: MovementType::Damage,
///     quantity: Quantity::from_units(5),
///     reason: None,
///     user_id: 1,
///     expiry_date: None,
/// };
/// assert_eq!(normalize_adjustment(&req).unwrap(), Quantity::from_units(-5));
/// ```
pub fn normalize_adjustment(req: &AdjustmentRequest) -> ValidationResult<Quantity> {
    let normalized = req.movement_type.normalize(req.quantity);

    if normalized.is_zero() {
        return Err(ValidationError::ZeroQuantity);
    }

    if req.expiry_date.is_some() && !req.movement_type.allows_expiry_date(normalized) {
        return Err(ValidationError::ExpiryNotAllowed {
            movement_type: req.movement_type,
        });
    }

    Ok(normalized)
}

// =============================================================================
// Stock Transfer
// =============================================================================

/// Validates a new transfer draft.
///
/// ## Rules
/// - Source and destination locations must differ
/// - At least one item, at most `MAX_TRANSFER_ITEMS`
/// - Every item quantity strictly positive
pub fn validate_transfer_draft(draft: &TransferDraft) -> ValidationResult<()> {
    if draft.from_location_id == draft.to_location_id {
        return Err(ValidationError::SameLocation);
    }

    if draft.items.is_empty() {
        return Err(ValidationError::EmptyItems);
    }

    if draft.items.len() > MAX_TRANSFER_ITEMS {
        return Err(ValidationError::Required {
            field: "items (too many)",
        });
    }

    for item in &draft.items {
        if !item.quantity.is_positive() {
            return Err(ValidationError::MustBePositive { field: "quantity" });
        }
    }

    Ok(())
}

/// Re-validates the form-side clamp on a received quantity.
///
/// The form clamps to [0, requested] client-side, but the workflow never
/// trusts it; the same check runs server-side before any ledger write.
pub fn check_received_range(received: Quantity, max: Quantity) -> ValidationResult<()> {
    if received.is_negative() || received > max {
        return Err(ValidationError::ReceivedOutOfRange { received, max });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
